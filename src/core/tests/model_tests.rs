// Tests for Model run-loop semantics: state transitions, wakeups,
// invariant violations, and both transport motion models.
#[cfg(test)]
mod tests {
    use crate::core::errors::SimError;
    use crate::core::model::Model;
    use crate::core::process::{ActorState, Outcome, Process, ScriptedProcess, Step};
    use crate::core::transport::Motion;
    use crate::core::types::{QueueId, SimTime, SinkId};
    use crate::core::wait_queue::Discipline;

    /// Parks in a queue; a pull routes it to the served sink, a refusal
    /// to the balk sink.
    struct BalkingCustomer {
        queue: QueueId,
        served: SinkId,
        balked: SinkId,
    }

    impl Process for BalkingCustomer {
        fn resume(&mut self, _now: SimTime, outcome: Outcome) -> Step {
            match outcome {
                Outcome::Started => Step::WaitIn(self.queue),
                Outcome::Pulled(_) => Step::Finish(self.served),
                Outcome::Barred(_) => Step::Finish(self.balked),
                _ => Step::Stop,
            }
        }
    }

    /// Pulls one actor out of a queue after a delay, then stops.
    struct Dispatcher {
        queue: QueueId,
        delay: SimTime,
    }

    impl Process for Dispatcher {
        fn resume(&mut self, _now: SimTime, outcome: Outcome) -> Step {
            match outcome {
                Outcome::Started => Step::Hold(self.delay),
                Outcome::Elapsed => Step::Leave(self.queue),
                _ => Step::Stop,
            }
        }
    }

    #[test]
    fn test_run_on_empty_model_is_a_noop() {
        let mut model = Model::new();
        let report = model.run().unwrap();
        assert_eq!(report.end_time, 0.0);
        assert_eq!(report.events_dispatched, 0);

        // A second run must not move the clock either.
        let report = model.run().unwrap();
        assert_eq!(report.end_time, 0.0);
        assert!(model.is_finished());
    }

    #[test]
    fn test_actor_reaches_done_through_hold_and_sink() {
        let mut model = Model::new();
        let sink = model.add_sink("out");
        let actor = model
            .activate(
                Box::new(ScriptedProcess::new(vec![
                    Step::Hold(4.0),
                    Step::Finish(sink),
                ])),
                1.0,
            )
            .unwrap();

        assert_eq!(model.actor_state(actor), Some(ActorState::Created));
        model.run().unwrap();
        assert_eq!(model.actor_state(actor), Some(ActorState::Done));
        assert_eq!(model.now(), 5.0);

        let sink = model.sink(sink).unwrap();
        assert_eq!(sink.completed(), 1);
        assert_eq!(sink.completions()[0].arrived, 1.0);
        assert_eq!(sink.completions()[0].completed, 5.0);
    }

    #[test]
    fn test_release_wakes_waiters_in_fcfs_order() {
        let mut model = Model::new();
        let teller = model.add_resource("teller", 1).unwrap();
        let sink = model.add_sink("done");

        for at in [0.0, 0.0, 0.0] {
            model
                .activate(
                    Box::new(ScriptedProcess::new(vec![
                        Step::Acquire(teller),
                        Step::Hold(2.0),
                        Step::Release(teller),
                        Step::Finish(sink),
                    ])),
                    at,
                )
                .unwrap();
        }

        model.run().unwrap();
        let completions = model.sink(sink).unwrap().completions();
        assert_eq!(completions.len(), 3);
        // Service is strictly serialized, in activation order.
        let finish_times: Vec<f64> = completions.iter().map(|c| c.completed).collect();
        assert_eq!(finish_times, vec![2.0, 4.0, 6.0]);
        let served: Vec<usize> = completions.iter().map(|c| c.actor.index()).collect();
        assert_eq!(served, vec![0, 1, 2]);

        let teller = model.resource(teller).unwrap();
        assert_eq!(teller.busy(), 0);
        assert_eq!(teller.queue_len(), 0);
    }

    #[test]
    fn test_release_without_hold_is_fatal_with_time() {
        let mut model = Model::new();
        let teller = model.add_resource("teller", 1).unwrap();
        model
            .activate(
                Box::new(ScriptedProcess::new(vec![
                    Step::Hold(3.0),
                    Step::Release(teller),
                ])),
                0.0,
            )
            .unwrap();

        let err = model.run().unwrap_err();
        assert_eq!(
            err,
            SimError::ResourceUnderflow {
                name: "teller".to_string(),
                at: 3.0,
            }
        );
    }

    #[test]
    fn test_negative_hold_is_rejected_as_past_scheduling() {
        let mut model = Model::new();
        model
            .activate(
                Box::new(ScriptedProcess::new(vec![Step::Hold(-1.0)])),
                2.0,
            )
            .unwrap();

        match model.run() {
            Err(SimError::SchedulePast { requested, now }) => {
                assert_eq!(requested, 1.0);
                assert_eq!(now, 2.0);
            }
            other => panic!("expected SchedulePast, got {:?}", other),
        }
    }

    #[test]
    fn test_barred_actor_takes_the_balk_branch_synchronously() {
        let mut model = Model::new();
        let line = model.add_queue("line", Discipline::Fcfs, Some(1)).unwrap();
        let served = model.add_sink("served");
        let balked = model.add_sink("balked");

        for at in [0.0, 1.0] {
            model
                .activate(
                    Box::new(BalkingCustomer {
                        queue: line,
                        served,
                        balked,
                    }),
                    at,
                )
                .unwrap();
        }
        model
            .activate(
                Box::new(Dispatcher {
                    queue: line,
                    delay: 5.0,
                }),
                0.0,
            )
            .unwrap();

        model.run().unwrap();

        // First customer parked, second found the line full and balked
        // at its own arrival instant.
        assert_eq!(model.sink(balked).unwrap().completed(), 1);
        assert_eq!(model.sink(balked).unwrap().completions()[0].completed, 1.0);
        assert_eq!(model.sink(served).unwrap().completed(), 1);
        assert_eq!(model.sink(served).unwrap().completions()[0].completed, 5.0);
        assert_eq!(model.queue(line).unwrap().barred_count(), 1);
    }

    #[test]
    fn test_leave_on_empty_queue_continues_with_sentinel() {
        let mut model = Model::new();
        let line = model.add_queue("line", Discipline::Fcfs, None).unwrap();
        let actor = model
            .activate(
                Box::new(Dispatcher {
                    queue: line,
                    delay: 1.0,
                }),
                0.0,
            )
            .unwrap();

        // The dispatcher's Leave finds nothing; it must still run to its
        // Stop rather than abort the run.
        model.run().unwrap();
        assert_eq!(model.actor_state(actor), Some(ActorState::Done));
    }

    #[test]
    fn test_stepped_transport_allows_overtaking() {
        let mut model = Model::new();
        let belt = model
            .add_transport("belt", 3.0, Motion::Stepped { tick: 1.0 }, Box::new(|_| 1.0))
            .unwrap();
        let sink = model.add_sink("off_belt");

        let slow = model
            .activate(
                Box::new(ScriptedProcess::new(vec![
                    Step::Enter {
                        transport: belt,
                        speed: None,
                    },
                    Step::Finish(sink),
                ])),
                0.0,
            )
            .unwrap();
        let fast = model
            .activate(
                Box::new(ScriptedProcess::new(vec![
                    Step::Enter {
                        transport: belt,
                        speed: Some(3.0),
                    },
                    Step::Finish(sink),
                ])),
                1.0,
            )
            .unwrap();

        model.run().unwrap();

        let completions = model.sink(sink).unwrap().completions();
        assert_eq!(completions.len(), 2);
        // The fast entrant boards at t=1, covers the whole belt over the
        // [1,2] tick, and exits at t=2; the slow one needs three full
        // ticks and exits at t=3. Later entrant out first: overtaking.
        let exits: Vec<(usize, f64)> = completions
            .iter()
            .map(|c| (c.actor.index(), c.completed))
            .collect();
        assert_eq!(exits, vec![(fast.index(), 2.0), (slow.index(), 3.0)]);
        assert_eq!(model.transport(belt).unwrap().exited(), 2);
        assert_eq!(model.transport(belt).unwrap().occupant_count(), 0);
    }

    #[test]
    fn test_duration_transport_clamps_exits_to_entry_order() {
        let mut model = Model::new();
        let road = model
            .add_transport("road", 10.0, Motion::Duration, Box::new(|_| 1.0))
            .unwrap();
        let sink = model.add_sink("arrivals");

        let first = model
            .activate(
                Box::new(ScriptedProcess::new(vec![
                    Step::Enter {
                        transport: road,
                        speed: None,
                    },
                    Step::Finish(sink),
                ])),
                0.0,
            )
            .unwrap();
        // Faster and later: would exit at t=2 unclamped.
        let second = model
            .activate(
                Box::new(ScriptedProcess::new(vec![
                    Step::Enter {
                        transport: road,
                        speed: Some(10.0),
                    },
                    Step::Finish(sink),
                ])),
                1.0,
            )
            .unwrap();

        model.run().unwrap();

        let completions = model.sink(sink).unwrap().completions();
        let exits: Vec<(usize, f64)> = completions
            .iter()
            .map(|c| (c.actor.index(), c.completed))
            .collect();
        assert_eq!(exits, vec![(first.index(), 10.0), (second.index(), 10.0)]);
    }

    #[test]
    fn test_run_until_leaves_later_events_pending() {
        let mut model = Model::new();
        let sink = model.add_sink("out");
        for at in [1.0, 2.0, 8.0] {
            model
                .activate(
                    Box::new(ScriptedProcess::new(vec![Step::Finish(sink)])),
                    at,
                )
                .unwrap();
        }

        let report = model.run_until(5.0).unwrap();
        assert_eq!(report.end_time, 2.0);
        assert_eq!(model.sink(sink).unwrap().completed(), 2);
        assert!(!model.is_finished());
        assert_eq!(model.pending_events(), 1);

        model.run().unwrap();
        assert_eq!(model.sink(sink).unwrap().completed(), 3);
        assert!(model.is_finished());
    }

    #[test]
    fn test_configuration_errors_fail_fast() {
        let mut model = Model::new();
        assert!(matches!(
            model.add_resource("bad", 0),
            Err(SimError::InvalidCapacity { .. })
        ));
        assert!(matches!(
            model.add_queue("bad", Discipline::Fcfs, Some(0)),
            Err(SimError::InvalidQueueBound { .. })
        ));
        assert!(matches!(
            model.add_transport("bad", 0.0, Motion::Duration, Box::new(|_| 1.0)),
            Err(SimError::InvalidTransport { .. })
        ));
        assert!(matches!(
            model.add_transport("bad", 5.0, Motion::Stepped { tick: 0.0 }, Box::new(|_| 1.0)),
            Err(SimError::InvalidTransport { .. })
        ));
        assert!(matches!(
            Model::with_start_time(-1.0),
            Err(SimError::NegativeStartTime { .. })
        ));
    }
}
