use log::{debug, info};
use uuid::Uuid;

use prosim::{
    Exponential, Model, Outcome, Process, QueueId, SimError, SimTime, SinkId, Step, UniformRange,
    Variate,
};

mod config;
use config::BankConfig;

/// A customer walks in, joins the lobby if there is room, and is served
/// when a teller calls them up. The served sink's turnaround statistic is
/// therefore the customer's waiting time.
struct Customer {
    tag: Uuid,
    lobby: QueueId,
    served: SinkId,
    balked: SinkId,
}

impl Process for Customer {
    fn resume(&mut self, now: SimTime, outcome: Outcome) -> Step {
        match outcome {
            Outcome::Started => Step::WaitIn(self.lobby),
            Outcome::Barred(_) => {
                info!("customer {} balked at t={:.2} (lobby full)", self.tag, now);
                Step::Finish(self.balked)
            }
            Outcome::Pulled(_) => {
                debug!("customer {} called up at t={:.2}", self.tag, now);
                Step::Finish(self.served)
            }
            _ => Step::Stop,
        }
    }
}

/// A teller repeatedly calls the next customer, serves them for a drawn
/// service time, and checks again. An idle teller re-polls the lobby at
/// the configured interval; the run is bounded by closing time.
struct Teller {
    index: usize,
    lobby: QueueId,
    service: UniformRange,
    poll_interval: f64,
    served: u64,
}

impl Process for Teller {
    fn resume(&mut self, now: SimTime, outcome: Outcome) -> Step {
        match outcome {
            Outcome::Started | Outcome::Elapsed => Step::Leave(self.lobby),
            Outcome::Dequeued(Some(customer)) => {
                self.served += 1;
                let duration = self.service.next();
                debug!(
                    "teller {} serves {} for {:.2} (t={:.2}, {} so far)",
                    self.index, customer, duration, now, self.served
                );
                Step::Hold(duration)
            }
            Outcome::Dequeued(None) => Step::Hold(self.poll_interval),
            _ => Step::Stop,
        }
    }
}

fn main() -> Result<(), SimError> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cfg = BankConfig::default();
    println!("Bank teller line: {:?}", cfg);

    let mut model = Model::new();
    let lobby = model.add_queue("lobby", cfg.discipline, Some(cfg.lobby_capacity))?;
    let served = model.add_sink("served");
    let balked = model.add_sink("balked");

    let arrivals = model.add_source(
        "front_door",
        Some(cfg.customers),
        Box::new(Exponential::new(cfg.mean_interarrival, cfg.seed)?),
        Box::new(move || {
            Box::new(Customer {
                tag: Uuid::new_v4(),
                lobby,
                served,
                balked,
            }) as Box<dyn Process>
        }),
    )?;

    for index in 0..cfg.tellers {
        let service = UniformRange::new(
            cfg.service_low,
            cfg.service_high,
            cfg.seed + 1 + index as u64,
        )?;
        model.activate(
            Box::new(Teller {
                index,
                lobby,
                service,
                poll_interval: cfg.poll_interval,
                served: 0,
            }),
            0.0,
        )?;
    }

    // Teller poll events dated past closing stay pending; the day ends
    // at the horizon.
    let report = model.run_until(cfg.closing_time)?;

    let served = model.sink(served).expect("served sink");
    let balked = model.sink(balked).expect("balked sink");
    let lobby = model.queue(lobby).expect("lobby queue");
    let arrivals = model.source(arrivals).expect("front door");

    println!("=================================");
    println!("Closed at t={:.2} ({} events)", report.end_time, report.events_dispatched);
    println!("Arrivals generated:  {}", arrivals.generated());
    println!("Customers served:    {}", served.completed());
    println!("Customers balked:    {} (barred count {})", balked.completed(), lobby.barred_count());
    println!("Still waiting:       {}", lobby.len());
    println!(
        "Waiting time:        mean {:.2}  max {:.2}  (n={})",
        served.turnaround().mean(),
        served.turnaround().max(),
        served.turnaround().count()
    );

    Ok(())
}
