use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use road_inspector::session::command::criteria_from_options;
use road_inspector::ClockPlayer;
use road_inspector::Reply;
use road_inspector::Session;
use road_inspector::VideoId;
use std::io::BufRead;
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser, Debug)]
#[command(version, about = "Check road survey measurements against threshold limits, frame by frame")]
struct Args {
    /// Survey sheet to load at start (.csv or .xlsx).
    #[arg(long)]
    data: Option<String>,

    /// First dash-cam video.
    #[arg(long)]
    video1: Option<PathBuf>,

    /// Second dash-cam video.
    #[arg(long)]
    video2: Option<PathBuf>,

    /// Field delimiter for .csv files.
    #[arg(long, default_value_t = ',')]
    delimiter: char,

    /// Keep rows whose cells are all empty.
    #[arg(long)]
    keep_empty_rows: bool,

    /// Text encoding of .csv files: auto, utf8 or windows1252.
    #[arg(long, default_value = "auto")]
    encoding: String,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let criteria = criteria_from_options(args.delimiter, args.keep_empty_rows, &args.encoding)?;
    let mut session: Session<ClockPlayer> = Session::new(criteria);

    for (video, path) in [(VideoId::First, args.video1), (VideoId::Second, args.video2)] {
        if let Some(path) = path {
            anyhow::ensure!(path.is_file(), "Video {} '{}' not found", video, path.display());
            session.attach_video(video, ClockPlayer::new(path));
        }
    }
    if let Some(data) = &args.data {
        let rows = session.load_file(data)?;
        println!("Loaded {} rows from '{}'", rows, data);
    }

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    let mut lines = stdin.lock().lines();
    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("Failed to read command")?;
        if line.trim().is_empty() {
            continue;
        }
        match session.execute_line(&line) {
            Ok(Reply::Text(text)) => println!("{}", text),
            Ok(Reply::Quit) => break,
            Err(error) => eprintln!("error: {}", error),
        }
    }
    Ok(())
}
