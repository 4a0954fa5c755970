// src/main.rs
//
// Demo: plays a small arrangement into the logging sink in real time.
// Run with RUST_LOG=info (or debug for every stop time and cycle).

use livecycle::{
    LogDiagnostics, LogSink, PatternExt, Scheduler, SchedulerConfig, SystemClock, chord, list,
};

/// Seconds of wall-clock time to run for.
const DEMO_SECONDS: f64 = 6.0;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut scheduler = Scheduler::new(
        SchedulerConfig::default().with_cycles_per_second(0.5),
        Box::new(SystemClock::new()),
        Box::new(LogSink::new()),
        Box::new(LogDiagnostics),
    );

    let bass = list(vec![55.0, 0.0, 82.41, 0.0]);
    let arp = list(vec![220.0, 277.18, 329.63])
        .join(list(vec![440.0]))
        .times(2);
    let pad = chord(vec![220.0, 277.18, 329.63]).every(2);
    let sparkle = list(vec![880.0, 1108.73, 1318.51, 1760.0]).choose_rand();

    let setup = [
        scheduler.play("bass", "sawtooth", bass),
        scheduler.play("arp", "square", arp),
        scheduler.play("pad", "triangle", pad),
        scheduler.play("sparkle", "sine", sparkle.divide(2)),
    ];
    for result in setup {
        if let Err(e) = result {
            log::error!("{}", e);
        }
    }

    scheduler.start();
    let deadline = scheduler.now() + DEMO_SECONDS;
    scheduler.run_until(deadline);

    if let Err(e) = scheduler.stop() {
        log::error!("{}", e);
    }
    scheduler.shutdown();
}
