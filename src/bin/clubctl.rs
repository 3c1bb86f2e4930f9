use clubctl::{cli, ClubError};

fn main() {
    // Install global collector configured based on CLUBCTL_LOG env var.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("CLUBCTL_LOG"))
        .with_target(true)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .init();

    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(num_cpus::get())
        .enable_io()
        .enable_time()
        .build()
        .unwrap()
        .block_on(async {
            run().await;
        })
}

async fn run() {
    if let Err(err) = run_inner().await {
        let code = match err {
            ClubError::Unauthenticated { message } => {
                eprintln!("unauthenticated: {}", message);
                2
            }
            ClubError::PermissionDenied => {
                eprintln!("permission denied");
                3
            }
            err => {
                eprintln!("{}", err);
                1
            }
        };
        std::process::exit(code);
    };
}

async fn run_inner() -> clubctl::Result<()> {
    cli::parse().run().await
}
