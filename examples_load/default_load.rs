use std::time::Instant;

use fieldlog::{fields, Config, NoopSink};

fn main() {
    let log = Config::default()
        .with_sink(NoopSink)
        .build()
        .with(fields! { "appname" => "load-test" });

    let n: u64 = 100_000;
    let start = Instant::now();

    for i in 0..n {
        log.error_with("default load test error", fields! { "iteration" => i });
    }

    let elapsed = start.elapsed();
    println!("default config: formatted {} records in {:?} (~{:.0} rec/s)",
        n,
        elapsed,
        n as f64 / elapsed.as_secs_f64()
    );
}
