use clap::{Parser, Subcommand};
use nav_agent_rs::{
    camera::{FileFrameSource, FrameSource, HttpCameraSource},
    config::load_config,
    describe::DescriptionComposer,
    detector::{Detector, HttpDetector},
    error::Result as NavResult,
    llm::{Responder, SpokenNotices, WatsonxLlm},
    pipeline,
    spatial::DistanceModel,
    stt::{NoInput, SpeechInput, WavFileSource, WhisperStt},
    tts::{speak_best_effort, AudioSink, ElevenLabsTts, FileSink, SpeechOutput},
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[derive(Parser)]
#[command(name = "nav-agent", about = "Narrates detected surroundings and answers spoken questions")]
struct Cli {
    /// Distance heuristic applied for the whole run (never mixed)
    #[arg(long, value_enum, default_value = "linear")]
    distance_model: DistanceModel,

    /// Directory where synthesized speech files are written
    #[arg(long, default_value = "speech-out")]
    speech_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Describe a single image, then optionally answer one question
    Describe {
        /// Image file to describe
        #[arg(long)]
        image: PathBuf,

        /// Question as text (skips speech recognition)
        #[arg(long, conflicts_with = "question_wav")]
        question: Option<String>,

        /// Recorded WAV question to transcribe
        #[arg(long)]
        question_wav: Option<PathBuf>,
    },
    /// Continuously describe snapshots from a network camera
    Live {
        /// Snapshot URL of the camera
        #[arg(long)]
        camera_url: String,

        /// Milliseconds between capture cycles
        #[arg(long, default_value_t = 1000)]
        interval_ms: u64,

        /// Recorded WAV question to transcribe on each command
        #[arg(long)]
        question_wav: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> NavResult<()> {
    env_logger::init();
    let cli = Cli::parse();

    log::info!("🚀 Initializing nav-agent");

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e);
            eprintln!("   Required: WATSONX_API_KEY, WATSONX_PROJECT_ID, GROQ_API_KEY, ELEVENLABS_API_KEY");
            eprintln!("   Optional: WATSONX_URL, DETECTOR_URL");
            std::process::exit(1);
        }
    };

    tokio::fs::create_dir_all(&cli.speech_dir).await?;
    let sink: Arc<dyn AudioSink> = Arc::new(FileSink::new(&cli.speech_dir));
    let speech_out: Arc<dyn SpeechOutput> = Arc::new(ElevenLabsTts::new(
        config.elevenlabs_key().to_string(),
        sink,
    ));
    log::info!("🔊 Speech output initialized");

    let detector: Arc<dyn Detector> = Arc::new(HttpDetector::new(config.detector_url.clone()));
    log::info!("👁  Detector endpoint: {}", config.detector_url);

    let responder: Arc<dyn Responder> = Arc::new(WatsonxLlm::new(
        config.watsonx_key().to_string(),
        config.watsonx_project_id.clone(),
        config.watsonx_url.clone(),
    ));
    log::info!("🤖 Responder initialized");

    let composer = DescriptionComposer::new(cli.distance_model);

    match cli.command {
        Command::Describe {
            image,
            question,
            question_wav,
        } => {
            let mut source = FileFrameSource::new(&image);
            let frame = source.next_frame().await?;
            let description =
                pipeline::describe_frame(&frame, detector.as_ref(), &composer).await;
            println!("Surroundings: {}", description);
            speak_best_effort(speech_out.as_ref(), &description).await;

            let question = match (question, question_wav) {
                (Some(text), _) => Some(text),
                (None, Some(wav)) => {
                    let stt = WhisperStt::new(
                        config.groq_key().to_string(),
                        Arc::new(WavFileSource::new(wav)),
                    );
                    stt.listen().await
                }
                (None, None) => None,
            };

            if let Some(question) = question {
                match responder.respond(&description, &question).await {
                    Ok(answer) => {
                        println!("Assistant: {}", answer);
                        speak_best_effort(speech_out.as_ref(), &answer).await;
                    }
                    Err(e) => {
                        log::error!("Responder failed: {}", e);
                        speak_best_effort(speech_out.as_ref(), SpokenNotices::responder_failure())
                            .await;
                    }
                }
            }
        }
        Command::Live {
            camera_url,
            interval_ms,
            question_wav,
        } => {
            let cancel = CancellationToken::new();
            let source = Box::new(HttpCameraSource::new(camera_url));
            let (descriptions, capture) = pipeline::spawn_capture_loop(
                source,
                Arc::clone(&detector),
                composer,
                Duration::from_millis(interval_ms),
                cancel.clone(),
            );
            log::info!("📷 Capture loop started (every {} ms)", interval_ms);

            let speech_in: Arc<dyn SpeechInput> = match question_wav {
                Some(wav) => Arc::new(WhisperStt::new(
                    config.groq_key().to_string(),
                    Arc::new(WavFileSource::new(wav)),
                )),
                None => Arc::new(NoInput),
            };

            tokio::select! {
                _ = pipeline::run_live(
                    descriptions,
                    speech_in,
                    Arc::clone(&speech_out),
                    responder,
                    cancel.clone(),
                ) => {}
                _ = tokio::signal::ctrl_c() => {
                    log::info!("Received Ctrl+C, shutting down...");
                }
            }

            cancel.cancel();
            let _ = capture.await;
            println!("\n👋 Goodbye!");
        }
    }

    Ok(())
}
