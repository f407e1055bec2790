//! lazylink demo driver.

use lazylink_demos::bench::{expected_total, DispatchBench};
use lazylink_demos::fibonacci::{self, FibReport, Linkage};
use lazylink_demos::lazy_constant::{ConstantResource, EagerResource, LazyResource};
use lazylink_demos::{greeting, group_digits, init_tracing, DemoConfig, DemoError};
use lazylink_memo::CacheTableStore;

fn main() {
    init_tracing();
    let config = DemoConfig::from_env();
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];
    let result = match command.as_str() {
        "fib-sum" => {
            let mut linkage = Some(Linkage::Memoized(CacheTableStore::global()));
            let mut count = config.fib_count;
            for arg in args.iter().skip(2) {
                match arg.as_str() {
                    "--naive" => linkage = None,
                    "--site" => linkage = Some(Linkage::Constant),
                    "--memo" => linkage = Some(Linkage::Memoized(CacheTableStore::global())),
                    _ => count = parse_count(arg, "Usage: lazylink fib-sum [--naive|--site|--memo] [N]"),
                }
            }
            fib_sum(linkage.as_ref(), count)
        }
        "fib-sum-big" => {
            let count = args.get(2).map_or(config.big_fib_count, |arg| {
                parse_count(arg, "Usage: lazylink fib-sum-big [N]")
            });
            fib_sum_big(count)
        }
        "greet" => {
            let tag = args.get(2).cloned().or(config.greeting_tag);
            greet(tag.as_deref())
        }
        "lazy-constant" => {
            if args.len() < 3 {
                eprintln!("Usage: lazylink lazy-constant <path>");
                eprintln!("Example: lazylink lazy-constant staff.xml");
                std::process::exit(1);
            }
            lazy_constant(&args[2])
        }
        "bench" => bench(&config),
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        "version" | "--version" | "-V" => {
            println!("lazylink {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn print_usage() {
    println!("lazylink: call sites resolved on first use, with optional memoization");
    println!();
    println!("Usage: lazylink <command> [options]");
    println!();
    println!("Commands:");
    println!("  fib-sum [N]          Sum the first N Fibonacci numbers as 64-bit integers");
    println!("  fib-sum-big [N]      Sum the first N Fibonacci numbers as big integers (memoized)");
    println!("  greet [tag]          Greet through a tag-selected target (tag 2013 picks the newer one)");
    println!("  lazy-constant <path> Compare eager and lazy parsing of a notes document");
    println!("  bench                Time one operation through each dispatch style");
    println!("  help                 Show this help message");
    println!("  version              Show version information");
    println!();
    println!("fib-sum options:");
    println!("  --naive              Plain recursion");
    println!("  --site               Recursion through an unmemoized call site");
    println!("  --memo               Recursion through a memoized call site (default)");
    println!();
    println!("Environment:");
    println!("  LAZYLINK_FIB_COUNT, LAZYLINK_BIG_FIB_COUNT, LAZYLINK_BENCH_LOOPS,");
    println!("  LAZYLINK_BENCH_REPEATS, LAZYLINK_GREETING_SUFFIX, RUST_LOG");
}

fn parse_count(arg: &str, usage: &str) -> u32 {
    arg.parse().unwrap_or_else(|_| {
        eprintln!("error: invalid count '{arg}'");
        eprintln!("{usage}");
        std::process::exit(1);
    })
}

fn print_report<T: ToString>(title: &str, count: u32, report: &FibReport<T>) -> String {
    let total = report.total.to_string();
    println!("SUM OF FIRST {count} FIBONACCI NUMBERS ({title})");
    println!("RESULT: {}", group_digits(&total));
    println!("RAW CALLS: {}", report.raw_entries);
    println!("TIME: {} ms", report.elapsed.as_millis());
    total
}

fn fib_sum(linkage: Option<&Linkage>, count: u32) -> Result<(), DemoError> {
    match linkage {
        None => {
            print_report("naive", count, &fibonacci::sum_naive(count)?);
        }
        Some(linkage @ Linkage::Constant) => {
            print_report("call site", count, &fibonacci::sum_long(linkage, count)?);
        }
        Some(linkage @ Linkage::Memoized(_)) => {
            print_report("memoized", count, &fibonacci::sum_long(linkage, count)?);
        }
    }
    Ok(())
}

fn fib_sum_big(count: u32) -> Result<(), DemoError> {
    let report = fibonacci::sum_big(&CacheTableStore::global(), count)?;
    let total = print_report("big integer, memoized", count, &report);
    println!("DIGITS: {}", total.trim_start_matches('-').len());
    Ok(())
}

fn greet(tag: Option<&str>) -> Result<(), DemoError> {
    println!("{}", greeting::greet("Confitura")?);
    println!("{}", greeting::greet_tagged("Confitura", tag)?);
    let greeter = greeting::greeter(tag)?;
    println!("{}", greeter("Hello !".to_string())?);
    Ok(())
}

fn lazy_constant(path: &str) -> Result<(), DemoError> {
    println!("Lazy resource:");
    let lazy = LazyResource::new(path)?;
    println!("  {}", lazy.not_needing_notes());
    println!("  parsed {} time(s) so far", lazy.parse_count());
    println!("  NOTES: {}", lazy.notes()?);
    println!("  parsed {} time(s) so far", lazy.parse_count());

    println!("Eager resource:");
    let eager = EagerResource::load(path)?;
    println!("  {}", eager.not_needing_notes());
    println!("  NOTES: {}", eager.notes()?);
    Ok(())
}

fn bench(config: &DemoConfig) -> Result<(), DemoError> {
    let bench = DispatchBench::new()?;
    let expected = expected_total(config.bench_loops)
        .map_or_else(|| "overflow".to_string(), |total| total.to_string());
    println!(
        "{} x {} calls, {} repeats, expected {expected}",
        config.bench_loops, config.bench_loops, config.bench_repeats,
    );
    let mut current = None;
    for timing in bench.run_all(config.bench_loops, config.bench_repeats)? {
        if current != Some(timing.style) {
            println!();
            println!("Benchmark {}", timing.style.name().to_uppercase());
            current = Some(timing.style);
        }
        println!("{}, TIME: {} ms", timing.total, timing.elapsed.as_millis());
    }
    Ok(())
}
