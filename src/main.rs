use std::env;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use watermark_client::{
    status_line, ApiClient, AppError, Config, Credentials, FileSessionStorage, JobService,
    NewAccount, Result, SessionService, SessionStore, UploadService, VideoFile,
};

#[tokio::main]
async fn main() {
    // Initialisation du logging
    setup_tracing();

    // Chargement de la configuration
    let config = Config::from_env().expect("❌ Impossible de charger la configuration");
    info!("🎬 {} v{}", watermark_client::NAME, watermark_client::VERSION);
    info!("🔗 Backend: {}", config.api_base_url);

    // Initialisation des services
    let storage = FileSessionStorage::new(config.session_file.clone());
    let store = Arc::new(SessionStore::new(Box::new(storage)));
    let api = Arc::new(
        ApiClient::new(&config, store.clone()).expect("❌ Impossible d'initialiser le client HTTP"),
    );

    let sessions = SessionService::new(api.clone(), store.clone());
    let uploads = Arc::new(UploadService::new(api.clone(), config.max_upload_size_mb));
    let jobs = Arc::new(JobService::new(api.clone(), &config));

    let args: Vec<String> = env::args().collect();
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("help");

    let result = match command {
        "register" => cmd_register(&sessions, &args).await,
        "login" => cmd_login(&sessions, &args).await,
        "logout" => {
            sessions.logout().await;
            println!("Signed out.");
            Ok(())
        }
        "me" => cmd_me(&sessions).await,
        "subscribe" => cmd_subscribe(&sessions, &args).await,
        "subscription" => cmd_subscription(&sessions).await,
        "unsubscribe" => cmd_unsubscribe(&sessions).await,
        "upload" => cmd_upload(&sessions, &uploads, &jobs, &args).await,
        "jobs" => cmd_jobs(&sessions, &jobs).await,
        "status" => cmd_status(&sessions, &jobs, &args).await,
        "download" => cmd_download(&sessions, &jobs, &args).await,
        "watch" => cmd_watch(&sessions, &jobs, &args).await,
        _ => {
            print_usage();
            Ok(())
        }
    };

    if let Err(e) = result {
        if e.requires_login() {
            eprintln!("Please sign in again: watermark-client login <email> <password>");
        }
        error!("❌ {}", e);
        std::process::exit(1);
    }
}

/// Garde d'accès du dashboard : authentification puis abonnement actif.
/// Sans abonnement, l'upload et le registre des jobs ne sont pas atteignables.
async fn dashboard_gate(sessions: &SessionService) -> Result<bool> {
    if !sessions.is_authenticated().await {
        return Err(AppError::Unauthorized);
    }

    if !sessions.is_subscribed().await {
        println!("Subscription required");
        println!("You need an active subscription to upload and process videos.");
        println!("Run `watermark-client subscribe <price-id>` to get started.");
        return Ok(false);
    }

    Ok(true)
}

async fn cmd_register(sessions: &SessionService, args: &[String]) -> Result<()> {
    let (email, password, confirmation) = match (args.get(2), args.get(3), args.get(4)) {
        (Some(e), Some(p), Some(c)) => (e, p, c),
        _ => {
            return Err(AppError::Validation(
                "Usage: watermark-client register <email> <password> <password-confirmation>"
                    .to_string(),
            ))
        }
    };

    let user = sessions
        .register(&NewAccount {
            email: email.clone(),
            password: password.clone(),
            password_confirmation: confirmation.clone(),
        })
        .await?;

    println!("Registration successful for {}! Please log in.", user.email);
    Ok(())
}

async fn cmd_login(sessions: &SessionService, args: &[String]) -> Result<()> {
    let (email, password) = match (args.get(2), args.get(3)) {
        (Some(e), Some(p)) => (e, p),
        _ => {
            return Err(AppError::Validation(
                "Usage: watermark-client login <email> <password>".to_string(),
            ))
        }
    };

    let session = sessions
        .login(&Credentials {
            email: email.clone(),
            password: password.clone(),
        })
        .await?;

    println!("Login successful!");
    if let Some(user) = session.user {
        println!(
            "Welcome back, {}! Upload videos to remove watermarks.",
            user.email
        );
    }
    Ok(())
}

async fn cmd_me(sessions: &SessionService) -> Result<()> {
    if !sessions.is_authenticated().await {
        println!("Not signed in.");
        return Ok(());
    }

    let user = sessions.refresh_profile().await?;
    println!("Email:        {}", user.email);
    println!("Subscription: {:?}", user.subscription_tier);
    if let Some(expires_at) = &user.subscription_expires_at {
        println!("Expires:      {}", watermark_client::format_date(expires_at));
    }
    Ok(())
}

async fn cmd_subscribe(sessions: &SessionService, args: &[String]) -> Result<()> {
    let price_id = args.get(2).ok_or_else(|| {
        AppError::Validation("Usage: watermark-client subscribe <price-id>".to_string())
    })?;

    if !sessions.is_authenticated().await {
        return Err(AppError::Unauthorized);
    }

    let info = sessions.subscribe(price_id).await?;
    println!("Subscription active: {:?}", info.subscription_tier);
    Ok(())
}

async fn cmd_subscription(sessions: &SessionService) -> Result<()> {
    if !sessions.is_authenticated().await {
        return Err(AppError::Unauthorized);
    }

    let info = sessions.subscription_info().await?;
    println!("Tier:   {:?}", info.subscription_tier);
    println!("Active: {}", info.is_active);
    if let Some(expires_at) = &info.expires_at {
        println!("Expires: {}", watermark_client::format_date(expires_at));
    }
    Ok(())
}

async fn cmd_unsubscribe(sessions: &SessionService) -> Result<()> {
    if !sessions.is_authenticated().await {
        return Err(AppError::Unauthorized);
    }

    let info = sessions.cancel_subscription().await?;
    println!("Subscription cancelled (tier: {:?}).", info.subscription_tier);
    Ok(())
}

async fn cmd_upload(
    sessions: &SessionService,
    uploads: &Arc<UploadService>,
    jobs: &Arc<JobService>,
    args: &[String],
) -> Result<()> {
    let path = args.get(2).ok_or_else(|| {
        AppError::Validation("Usage: watermark-client upload <video-file>".to_string())
    })?;

    if !dashboard_gate(sessions).await? {
        return Ok(());
    }

    let file = VideoFile::from_path(path)?;

    // Affichage de la progression pendant l'envoi
    let mut progress = uploads.progress();
    let progress_task = tokio::spawn(async move {
        while progress.changed().await.is_ok() {
            let percent = *progress.borrow();
            info!("⏳ Upload: {}%", percent);
            if percent >= 100 {
                break;
            }
        }
    });

    let receipt = match uploads.submit(&file).await {
        Ok(receipt) => receipt,
        Err(e) => {
            progress_task.abort();
            return Err(e);
        }
    };
    let _ = progress_task.await;

    println!(
        "Video uploaded successfully! Processing started (job {}).",
        receipt.job_id
    );

    // La soumission ne met pas à jour le registre : rafraîchissement explicite
    jobs.refresh().await?;
    Ok(())
}

async fn cmd_jobs(sessions: &SessionService, jobs: &Arc<JobService>) -> Result<()> {
    if !dashboard_gate(sessions).await? {
        return Ok(());
    }

    let list = jobs.refresh().await?;

    if list.is_empty() {
        println!("No videos uploaded yet");
        return Ok(());
    }

    println!("Processing History");
    for job in &list {
        println!("[{}] {} — {}", job.id, job.original_filename, status_line(job));
        println!("    Uploaded:  {}", watermark_client::format_date(&job.created_at));
        if let Some(started_at) = &job.processing_started_at {
            println!("    Started:   {}", watermark_client::format_date(started_at));
        }
        if let Some(completed_at) = &job.processing_completed_at {
            println!("    Completed: {}", watermark_client::format_date(completed_at));
        }
        if job.is_downloadable() {
            println!("    Download:  watermark-client download {}", job.id);
        }
    }
    Ok(())
}

async fn cmd_status(
    sessions: &SessionService,
    jobs: &Arc<JobService>,
    args: &[String],
) -> Result<()> {
    let job_id = parse_job_id(args, "status")?;

    if !dashboard_gate(sessions).await? {
        return Ok(());
    }

    let status = jobs.job_status(job_id).await?;
    println!("Job {}: {}", status.job_id, status.status.display().label);
    if let Some(progress) = status.progress {
        println!("Progress: {:.0}%", progress);
    }
    if let Some(message) = &status.error_message {
        println!("Error: {}", message);
    }
    Ok(())
}

async fn cmd_download(
    sessions: &SessionService,
    jobs: &Arc<JobService>,
    args: &[String],
) -> Result<()> {
    let job_id = parse_job_id(args, "download")?;

    if !dashboard_gate(sessions).await? {
        return Ok(());
    }

    jobs.refresh().await?;
    let reference = jobs.download(job_id).await?;

    println!("Your processed video is ready:");
    println!("{}", reference.download_url);
    println!(
        "Link expires: {}",
        watermark_client::format_date(&reference.expires_at)
    );
    Ok(())
}

async fn cmd_watch(
    sessions: &SessionService,
    jobs: &Arc<JobService>,
    args: &[String],
) -> Result<()> {
    let job_id = parse_job_id(args, "watch")?;

    if !dashboard_gate(sessions).await? {
        return Ok(());
    }

    // Le snapshot du dashboard est tenu à jour pendant l'attente
    let auto_refresh = jobs.start_auto_refresh(Duration::from_secs(15));
    let terminal = jobs.poll_until_terminal(job_id).await?;
    auto_refresh.stop();

    println!("Job {}: {}", terminal.job_id, terminal.status.display().label);
    if let Some(message) = &terminal.error_message {
        println!("Error: {}", message);
    }
    Ok(())
}

fn parse_job_id(args: &[String], command: &str) -> Result<i64> {
    args.get(2)
        .ok_or_else(|| {
            AppError::Validation(format!("Usage: watermark-client {} <job-id>", command))
        })?
        .parse::<i64>()
        .map_err(|_| AppError::Validation("Job id must be a number".to_string()))
}

fn print_usage() {
    println!("{} v{}", watermark_client::NAME, watermark_client::VERSION);
    println!();
    println!("Usage: watermark-client <command> [args]");
    println!();
    println!("Commands:");
    println!("  register <email> <password> <confirmation>  Create an account");
    println!("  login <email> <password>                    Sign in");
    println!("  logout                                      Sign out");
    println!("  me                                          Show the current profile");
    println!("  subscribe <price-id>                        Activate a subscription");
    println!("  subscription                                Show the current subscription");
    println!("  unsubscribe                                 Cancel the subscription");
    println!("  upload <video-file>                         Submit a video for processing");
    println!("  jobs                                        List processing jobs");
    println!("  status <job-id>                             Show one job's status");
    println!("  download <job-id>                           Get the processed video link");
    println!("  watch <job-id>                              Follow a job until it finishes");
}

/// Configure le tracing pour le logging structuré
fn setup_tracing() {
    let log_level = env::var("LOG_LEVEL")
        .unwrap_or_else(|_| "info".into())
        .parse()
        .unwrap_or(tracing::Level::INFO);

    let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "compact".into());

    let subscriber = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(log_level.into()),
        )
        .with(if log_format == "json" {
            Box::new(
                tracing_subscriber::fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(true),
            ) as Box<dyn tracing_subscriber::Layer<_> + Send + Sync>
        } else {
            Box::new(tracing_subscriber::fmt::layer().compact())
                as Box<dyn tracing_subscriber::Layer<_> + Send + Sync>
        });

    subscriber.init();
}
