use log::{debug, info, LevelFilter};
use ordered_rbtree::arena::TypedArena;
use ordered_rbtree::red_black_tree::RedBlackSet;
use rand::Rng;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use std::error;
use std::fmt;
use std::hint;
use std::process;
use std::str::FromStr;
use std::time::Instant;

const WORKLOADS: [&str; 7] = [
    "Unique Inserts",
    "Repeated Inserts",
    "Unique Deletes",
    "Repeated Deletes",
    "Queries",
    "Iterations",
    "NewNodes",
];

#[derive(Debug)]
enum ConfigError {
    InvalidValue { option: &'static str, value: String },
    UnknownOption(String),
}

impl error::Error for ConfigError {}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::InvalidValue { option, value } => {
                write!(f, "invalid value `{}` for option `{}`", value, option)
            },
            ConfigError::UnknownOption(arg) => write!(f, "unknown option `{}`", arg),
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct BenchConfig {
    size: usize,
    runs: usize,
    log_level: LevelFilter,
}

impl Default for BenchConfig {
    fn default() -> Self {
        BenchConfig {
            size: 1_000_000,
            runs: 10,
            log_level: LevelFilter::Info,
        }
    }
}

fn parse_value<T>(option: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
{
    value.parse().map_err(|_| ConfigError::InvalidValue {
        option,
        value: value.to_string(),
    })
}

fn parse_config<I>(args: I) -> Result<BenchConfig, ConfigError>
where
    I: IntoIterator<Item = String>,
{
    let mut config = BenchConfig::default();
    for arg in args {
        // accepts both `--size=N` and the single-dash `-size=N`
        let option = arg.trim_start_matches('-');
        let mut parts = option.splitn(2, '=');
        match (parts.next(), parts.next()) {
            (Some("size"), Some(value)) => config.size = parse_value("size", value)?,
            (Some("runs"), Some(value)) => {
                config.runs = parse_value::<usize>("runs", value)?.max(1)
            },
            (Some("log"), Some(value)) => config.log_level = parse_value("log", value)?,
            _ => return Err(ConfigError::UnknownOption(arg.clone())),
        }
    }
    Ok(config)
}

fn timed<F>(f: F) -> f64
where
    F: FnOnce(),
{
    let start = Instant::now();
    f();
    start.elapsed().as_secs_f64()
}

fn bench(values: &[usize]) -> [f64; 7] {
    let mut times = [0.0; 7];
    let mut set = RedBlackSet::new();

    times[0] = timed(|| {
        for value in values {
            set.insert(*value);
        }
    });
    times[1] = timed(|| {
        for value in values {
            set.insert(*value);
        }
    });
    times[2] = timed(|| {
        for value in &values[..values.len() / 2] {
            set.remove(value);
        }
    });
    times[3] = timed(|| {
        for value in &values[..values.len() / 2] {
            set.remove(value);
        }
    });
    times[4] = timed(|| {
        for value in 0..values.len() {
            hint::black_box(set.contains(&value));
        }
    });

    let mut sum = 0usize;
    times[5] = timed(|| set.for_each(|value| sum = sum.wrapping_add(*value)));
    debug!("sum of remaining elements: {}", sum);

    times[6] = timed(|| {
        let mut arena = TypedArena::new(values.len().max(1));
        for value in values {
            arena.allocate(*value);
        }
    });
    times
}

fn main() {
    let config = match parse_config(std::env::args().skip(1)) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err);
            eprintln!("usage: rbtree-bench [--size=N] [--runs=N] [--log=LEVEL]");
            process::exit(2);
        },
    };
    if let Err(err) = TermLogger::init(
        config.log_level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ) {
        eprintln!("failed to initialize logging: {}", err);
    }
    info!("benchmark config: {:?}", config);

    let mut values: Vec<usize> = (0..config.size).collect();
    rand::thread_rng().shuffle(&mut values);

    let mut total = [0.0; 7];
    for run in 0..config.runs {
        let times = bench(&values);
        debug!("run {}: {:?}", run, times);
        for (total, time) in total.iter_mut().zip(times.iter()) {
            *total += time;
        }
    }

    let counts = [
        config.size,
        config.size,
        config.size / 2,
        config.size / 2,
        config.size,
        config.size,
        config.size,
    ];
    println!(
        "Using input size {} and averaged over {} runs.",
        config.size, config.runs,
    );
    for ((total, count), name) in total.iter().zip(counts.iter()).zip(WORKLOADS.iter()) {
        println!("{:3.3}:\t{}\t{}", total / config.runs as f64, count, name);
    }
}
