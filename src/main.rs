use clap::{Parser, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cachebench::partition::WorkRange;
use cachebench::scenarios::memcached_set::{self, SetPlan};
use cachebench::scenarios::preflight;
use cachebench::scenarios::redis_mget::{self, GetPlan};
use cachebench::store::{MemcachedStore, RedisStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Scenario {
    All,
    MemcachedSet,
    RedisMget,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long, value_enum, default_value_t = Scenario::All)]
    scenario: Scenario,

    #[arg(long, env = "MEMCACHED_URL", default_value = "memcache://127.0.0.1:11211")]
    memcached_url: String,

    #[arg(long, env = "REDIS_URL", default_value = "redis://127.0.0.1:6379/")]
    redis_url: String,

    #[arg(long, default_value_t = 4)]
    set_workers: usize,

    /// Keys written in total, split evenly across the SET workers.
    #[arg(long, default_value_t = 400_000)]
    set_items: usize,

    #[arg(long, default_value_t = 12)]
    get_workers: usize,

    /// Keys read per trial, split evenly across the MGET workers.
    #[arg(long, default_value_t = 1_200_000)]
    get_items: usize,

    #[arg(long, default_value_t = 80)]
    batch_size: usize,

    #[arg(long, default_value_t = 30)]
    trials: usize,

    /// Redis connections opened before the trials start.
    #[arg(long, default_value_t = 12)]
    redis_connections: usize,

    /// Populate every key the MGET trials read before measuring.
    #[arg(long)]
    seed_redis: bool,

    #[arg(long)]
    skip_preflight: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cachebench=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("\n🏋️  CACHE BENCHMARK");
    println!("Scenario: {:?}", args.scenario);

    if matches!(args.scenario, Scenario::All | Scenario::MemcachedSet) {
        bench_memcached_set(&args)?;
    }
    if matches!(args.scenario, Scenario::All | Scenario::RedisMget) {
        bench_redis_mget(&args).await?;
    }
    Ok(())
}

fn bench_memcached_set(args: &Args) -> anyhow::Result<()> {
    let plan = SetPlan {
        total_items: args.set_items,
        workers: args.set_workers,
    };
    plan.validate()?;
    println!("\nTarget: {}", args.memcached_url);

    // The memcache client blocks; keep it off the async workers.
    let outcome = tokio::task::block_in_place(|| -> anyhow::Result<_> {
        let store = MemcachedStore::connect(&args.memcached_url, plan.workers as u32)?;
        if !args.skip_preflight {
            preflight::memcached(&store)?;
        }
        println!(
            "\n🚀 SET {} keys with {} threads...",
            plan.total_items, plan.workers
        );
        Ok(memcached_set::run(&store, &plan)?)
    })?;

    println!(
        "Duration for Memcached SET {}, {} threads: {:?}",
        outcome.keys_written, plan.workers, outcome.elapsed
    );
    Ok(())
}

async fn bench_redis_mget(args: &Args) -> anyhow::Result<()> {
    let plan = GetPlan {
        total_items: args.get_items,
        workers: args.get_workers,
        batch_size: args.batch_size,
    };
    plan.validate()?;
    println!("\nTarget: {}", args.redis_url);

    let store = RedisStore::connect(&args.redis_url, args.redis_connections).await?;
    if !args.skip_preflight {
        preflight::redis(&store).await?;
    }
    let range = WorkRange::new(0, plan.workers * plan.keys_per_worker());
    if args.seed_redis && !range.is_empty() {
        let written = store.seed(range, plan.batch_size).await?;
        println!("🌱 Seeded {} keys", written);
    }

    println!(
        "\n🚀 MGET {} keys per trial, {} trials...",
        range.len(),
        args.trials
    );
    let report = redis_mget::run_trials(&store, &plan, args.trials).await?;

    println!("\n==============================");
    println!("🔥 FINAL RESULTS (Redis MGET)");
    println!("⏱️  AVG ALL:  {:.3}ms", report.mean_millis());
    match report.qps() {
        Some(qps) => println!("🚀 AVG QPS:  {:.2}", qps),
        None => println!("🚀 AVG QPS:  N/A"),
    }
    println!("==============================\n");
    Ok(())
}
