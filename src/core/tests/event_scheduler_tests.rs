// Tests for EventScheduler ordering guarantees
#[cfg(test)]
mod tests {
    use crate::core::event_scheduler::{EventScheduler, EventTarget};
    use crate::core::process::Outcome;
    use crate::core::types::ActorId;

    fn resume(index: usize) -> EventTarget {
        EventTarget::Resume {
            actor: ActorId(index),
            outcome: Outcome::Started,
        }
    }

    #[test]
    fn test_pops_in_time_order() {
        let mut scheduler = EventScheduler::new();
        scheduler.schedule(30.0, resume(0));
        scheduler.schedule(10.0, resume(1));
        scheduler.schedule(20.0, resume(2));

        let times: Vec<f64> = std::iter::from_fn(|| scheduler.pop_next().map(|e| e.time)).collect();
        assert_eq!(times, vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn test_equal_times_pop_in_enqueue_order() {
        let mut scheduler = EventScheduler::new();
        for index in 0..5 {
            scheduler.schedule(7.5, resume(index));
        }

        let mut previous_sequence = None;
        while let Some(event) = scheduler.pop_next() {
            if let Some(previous) = previous_sequence {
                assert!(event.sequence > previous, "tie-break must be stable");
            }
            previous_sequence = Some(event.sequence);
        }
    }

    #[test]
    fn test_interleaved_times_pop_in_time_then_sequence_order() {
        let mut scheduler = EventScheduler::new();
        scheduler.schedule(5.0, resume(0));
        scheduler.schedule(1.0, resume(1));
        scheduler.schedule(5.0, resume(2));
        scheduler.schedule(3.0, resume(3));
        scheduler.schedule(1.0, resume(4));

        let mut popped = Vec::new();
        while let Some(event) = scheduler.pop_next() {
            popped.push((event.time, event.sequence));
        }
        for window in popped.windows(2) {
            assert!(window[0] <= window[1], "events out of order: {:?}", popped);
        }
        assert_eq!(popped.len(), 5);
    }

    #[test]
    fn test_empty_scheduler_reports_empty() {
        let mut scheduler = EventScheduler::new();
        assert!(scheduler.is_empty());
        assert!(!scheduler.has_events());
        assert!(scheduler.pop_next().is_none());
        assert_eq!(scheduler.peek_next_time(), None);
    }
}
