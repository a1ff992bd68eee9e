use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::anyhow;
use clap::{Parser, Subcommand};

use sc_snip::app::{AppEvent, CaptureController, ResultInbox};
use sc_snip::error::AppResult;
use sc_snip::ocr::{OcrConfig, RecognitionPipeline, get_available_languages};
use sc_snip::screenshot::{
    Action, Effect, SystemClipboard, copy_snip, default_grabber, resolve_save_target, save_image,
};
use sc_snip::settings::{ConfigManager, Settings};
use sc_snip::translation::TranslationService;
use sc_snip::types::Point;

/// Region snip with text recognition and offline translation
#[derive(Parser)]
#[command(name = "sc_snip", version)]
struct Cli {
    /// Settings file (defaults to ~/.sc_snip/settings.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Freeze the screen and select the rectangle between two points
    Capture {
        /// Drag start, as X,Y
        #[arg(long, value_parser = parse_point)]
        from: Point,
        /// Drag end, as X,Y
        #[arg(long, value_parser = parse_point)]
        to: Point,
        /// Recognize text in the selection
        #[arg(long)]
        ocr: bool,
        /// Translate the recognized text (implies --ocr)
        #[arg(long)]
        translate: bool,
        /// Save the selection to a file or directory (defaults to the output directory)
        #[arg(long, value_name = "PATH")]
        save: Option<Option<PathBuf>>,
        /// Copy the recognized text, or the image when there is none
        #[arg(long)]
        copy: bool,
    },
    /// Translate text with the offline model or dictionary
    Translate {
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// List OCR languages whose models are installed
    Languages,
}

fn parse_point(s: &str) -> Result<Point, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got {s:?}"))?;
    let x = x.trim().parse::<i32>().map_err(|e| format!("bad X in {s:?}: {e}"))?;
    let y = y.trim().parse::<i32>().map_err(|e| format!("bad Y in {s:?}: {e}"))?;
    Ok(Point::new(x, y))
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            log::error!("failed to start runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if !e.is_user_visible() => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> AppResult<()> {
    let config = match &cli.config {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new(),
    };

    match cli.command {
        Commands::Capture {
            from,
            to,
            ocr,
            translate,
            save,
            copy,
        } => {
            let options = CaptureOptions {
                recognize: ocr || translate,
                translate,
                save,
                copy: copy || config.auto_copy(),
            };
            capture(&config, from, to, options).await
        }
        Commands::Translate { text } => {
            let settings = config.get();
            let service = Arc::new(translation_service(&settings));
            if let Some(result) = service.translate_detailed_async(text.join(" ")).await {
                log::debug!("translated via {:?}", result.method);
                println!("{}", result.translated);
            }
            Ok(())
        }
        Commands::Languages => {
            let settings = config.get();
            let languages = get_available_languages(&settings.ocr_models_dir);
            if languages.is_empty() {
                println!("no OCR models found in {}", settings.ocr_models_dir.display());
            }
            for lang in languages {
                println!("{:<10} {}", lang.id, lang.display_name);
            }
            Ok(())
        }
    }
}

struct CaptureOptions {
    recognize: bool,
    translate: bool,
    save: Option<Option<PathBuf>>,
    copy: bool,
}

async fn capture(
    config: &ConfigManager,
    from: Point,
    to: Point,
    options: CaptureOptions,
) -> AppResult<()> {
    let settings = config.get();
    let recognition = if options.recognize {
        load_recognizer(&config.ocr_config())
    } else {
        None
    };
    let translation = Arc::new(translation_service(&settings));
    let (mut controller, mut events) =
        CaptureController::new(default_grabber(), recognition, translation);

    let mut capture = controller.start_capture()?;
    let mut inbox = ResultInbox::new();
    inbox.open(capture.id);

    for action in [Action::PointerDown(from), Action::PointerMove(to), Action::PointerUp(to)] {
        for effect in capture.session.reduce(action) {
            if let Effect::SelectionChanged(changed) = effect {
                log::debug!(
                    "selection {} at ({}, {})",
                    changed.label,
                    changed.candidate.x,
                    changed.candidate.y
                );
            }
        }
    }

    let completed = capture
        .completion
        .await
        .map_err(|_| anyhow!("selection session ended without completing"))?;
    let Some(snip) = controller.finish(capture.id, completed)? else {
        log::info!("selection discarded");
        return Ok(());
    };

    if let Some(target) = &options.save {
        let output_dir = config.output_dir();
        if target.is_none() {
            std::fs::create_dir_all(&output_dir)?;
        }
        let (path, format) =
            resolve_save_target(target.as_deref(), &output_dir, config.save_format());
        save_image(&snip.image, &path, format)?;
        println!("{}", path.display());
    }

    // 最终文本：译文优先，其次是识别结果
    let mut final_text = None;
    if options.recognize {
        controller.request_recognition(&snip);
        while let Some(event) = events.recv().await {
            let Some(event) = inbox.accept(event) else {
                continue;
            };
            match event {
                AppEvent::RecognitionCompleted { result, .. } => {
                    let outcome = result?;
                    println!("{}", outcome.display_text());
                    if outcome.has_text() {
                        final_text = Some(outcome.text().to_string());
                    }
                    if !(options.translate && outcome.has_text()) {
                        break;
                    }
                    controller.request_translation(snip.session, outcome.text());
                }
                AppEvent::TranslationCompleted { result, .. } => {
                    if let Some(result) = result {
                        println!("{}", result.translated);
                        final_text = Some(result.translated);
                    }
                    break;
                }
            }
        }
        inbox.close();
    }

    if options.copy {
        let mut clipboard = SystemClipboard::open()?;
        copy_snip(&mut clipboard, &snip.image, final_text.as_deref())?;
    }
    Ok(())
}

fn translation_service(settings: &Settings) -> TranslationService {
    TranslationService::new(Box::new(settings.model_loader()), settings.dictionary())
}

#[cfg(feature = "ocr-engine")]
fn load_recognizer(config: &OcrConfig) -> Option<RecognitionPipeline> {
    use sc_snip::ocr::PaddleRecognizer;

    match PaddleRecognizer::new(config) {
        Ok(engine) => Some(RecognitionPipeline::new(Arc::new(engine))),
        Err(e) => {
            log::warn!("OCR engine unavailable: {e:#}");
            None
        }
    }
}

#[cfg(not(feature = "ocr-engine"))]
fn load_recognizer(_config: &OcrConfig) -> Option<RecognitionPipeline> {
    log::warn!("built without an OCR engine");
    None
}
