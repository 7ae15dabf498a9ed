//! Music Batch CLI
//!
//! Converts a music tree to MP3 or summarizes its metadata.

use clap::{Parser, Subcommand};
use env_logger::Env;
use log::{info, warn};
use std::path::PathBuf;
use std::process::ExitCode;

use music_batch::config::{DEFAULT_LOGS_DIR, DEFAULT_SUMMARY_DIR};
use music_batch::{
    run_conversion, run_metadata, ConvertConfig, Enricher, FfmpegTranscoder, GeminiEnricher,
    LoftyTagReader, MetadataConfig, MissingCredentials, PipelineError, ProgressReporter,
    RunContext, RunStatus,
};

const ABOUT: &str = r#"
Music Batch - procesamiento paralelo de bibliotecas musicales

Ejemplos de uso:
  music_batch convert --input_dir ~/Musica --output_dir ~/Musica_mp3     Convertir a MP3
  music_batch convert --input_dir ~/Musica --output_dir out --threads 4  Usar 4 hilos
  music_batch metadata --music_dir ~/Musica                              Resumen de metadatos
  music_batch metadata --music_dir ~/Musica --usar_ia                    Resumen con análisis IA
"#;

/// Parallel music library processor
#[derive(Parser)]
#[command(name = "music_batch")]
#[command(author, version, about = ABOUT, long_about = None)]
#[command(help_template = "\
{before-help}{name} {version}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Mostrar ayuda
    #[arg(short = 'h', long = "help", action = clap::ArgAction::Help, global = true)]
    help: Option<bool>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convertir archivos de audio a MP3 y copiar el resto
    #[command(about = "Convertir archivos de audio a MP3 y copiar el resto")]
    Convert {
        #[arg(long = "input_dir", required = true, help = "Directorio de entrada")]
        input_dir: PathBuf,

        #[arg(long = "output_dir", required = true, help = "Directorio de salida")]
        output_dir: PathBuf,

        #[arg(short = 't', long, default_value = "0", help = "Número de hilos, 0 para detectar automáticamente")]
        threads: usize,

        #[arg(long = "logs_dir", default_value = DEFAULT_LOGS_DIR, help = "Directorio de los reportes")]
        logs_dir: PathBuf,

        #[arg(long = "no-progress", help = "No emitir progreso JSON por stderr")]
        no_progress: bool,
    },

    /// Extraer metadatos y generar un resumen de la biblioteca
    #[command(about = "Extraer metadatos y generar un resumen de la biblioteca")]
    Metadata {
        #[arg(long = "music_dir", required = true, help = "Directorio de la biblioteca musical")]
        music_dir: PathBuf,

        #[arg(long = "usar_ia", help = "Pedir un análisis de IA del resumen")]
        usar_ia: bool,

        #[arg(short = 't', long, default_value = "0", help = "Número de hilos, 0 para detectar automáticamente")]
        threads: usize,

        #[arg(long = "summary_dir", default_value = DEFAULT_SUMMARY_DIR, help = "Directorio de los resúmenes")]
        summary_dir: PathBuf,

        #[arg(long = "no-progress", help = "No emitir progreso JSON por stderr")]
        no_progress: bool,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Convert {
            input_dir,
            output_dir,
            threads,
            logs_dir,
            no_progress,
        }) => {
            let config = ConvertConfig::builder()
                .input_dir(input_dir)
                .output_dir(output_dir)
                .logs_dir(logs_dir)
                .num_workers(threads)
                .show_progress(!no_progress)
                .build();
            convert(&config)
        }
        Some(Commands::Metadata {
            music_dir,
            usar_ia,
            threads,
            summary_dir,
            no_progress,
        }) => {
            let config = MetadataConfig::builder()
                .music_dir(music_dir)
                .summary_dir(summary_dir)
                .use_ai(usar_ia)
                .num_workers(threads)
                .show_progress(!no_progress)
                .build();
            metadata(&config)
        }
        None => {
            println!("{}", ABOUT);
            println!("Use 'music_batch convert -h' o 'music_batch metadata -h' para ver la ayuda de cada comando");
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn convert(config: &ConvertConfig) -> Result<(), PipelineError> {
    info!("Input: {:?}", config.input_dir);
    info!("Output: {:?}", config.output_dir);

    let transcoder = FfmpegTranscoder::new(config.target_bitrate.clone());
    let mut reporter = ProgressReporter::new(config.show_progress);
    let context = RunContext::new(config.logs_dir.clone());

    match run_conversion(config, &transcoder, &mut reporter, &context)? {
        RunStatus::NoFiles => println!("No se encontraron archivos para procesar."),
        RunStatus::Completed(run) => {
            println!("Proceso completado:");
            println!("  Convertidos: {}", run.report.converted.len());
            println!("  Copiados: {}", run.report.copied.len());
            println!("  Omitidos: {}", run.report.skipped.len());
            println!("  Errores: {}", run.report.error_count());
            println!("  Tiempo: {}s", run.report.total_time_sec);
            for path in &run.report_paths {
                println!("  Reporte: {}", path.display());
            }
        }
    }
    Ok(())
}

fn metadata(config: &MetadataConfig) -> Result<(), PipelineError> {
    let enricher: Option<Box<dyn Enricher>> = if config.use_ai {
        match GeminiEnricher::from_env() {
            Ok(gemini) => Some(Box::new(gemini)),
            Err(e) => {
                warn!("{}", e);
                Some(Box::new(MissingCredentials))
            }
        }
    } else {
        None
    };

    let mut reporter = ProgressReporter::new(config.show_progress);
    let context = RunContext::new(config.summary_dir.clone());

    let status = run_metadata(
        config,
        &LoftyTagReader::new(),
        enricher.as_deref(),
        &mut reporter,
        &context,
    )?;

    match status {
        RunStatus::NoFiles => println!("No se encontraron archivos de audio."),
        RunStatus::Completed(run) => {
            println!("Análisis completado:");
            println!("  Archivos analizados: {}", run.summary.archivos_analizados);
            println!("  Tiempo total de escucha: {}", run.summary.tiempo_total_escucha);
            println!("  Género predominante: {}", run.summary.genero_predominante);
            if let Some(enrichment) = &run.enrichment {
                println!("\n{}", enrichment.as_str());
            }
            for path in &run.report_paths {
                println!("  Reporte: {}", path.display());
            }
        }
    }
    Ok(())
}
