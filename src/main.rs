use anyhow::Result;
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;

use word_lens::app::{drain_events, App, AppEvent};
use word_lens::config::Config;
use word_lens::presentation::{AudioTransport, ResultView};
use word_lens::proxy;
use word_lens::quiz::QuizState;
use word_lens::session::LookupState;
use word_lens::storage::Storage;
use word_lens::upstream::UpstreamDictionary;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load();

    // Check command line arguments
    let args: Vec<String> = std::env::args().collect();
    let mode = args.get(1).map(|s| s.as_str()).unwrap_or("help");
    let word = args.get(2..).map(|rest| rest.join(" ")).unwrap_or_default();

    if mode == "serve" {
        println!("🌐 Starting dictionary proxy...\n");
        let upstream = UpstreamDictionary::new(config.upstream_url.clone());
        return proxy::serve(upstream, config.port).await;
    }

    if !matches!(
        mode,
        "lookup"
            | "save"
            | "download"
            | "history"
            | "clear-history"
            | "recent"
            | "daily"
            | "theme"
            | "quiz"
    ) {
        print_usage();
        return Ok(());
    }

    let mut app = App::new(&config).await?;
    let mut events = app.subscribe();
    app.load(&Storage::today()).await?;
    render_events(&mut events);

    match mode {
        "lookup" => {
            let state = app.lookup(&word).await?.clone();
            if let LookupState::Success(view) = state {
                print_result(&view, app.audio());
            }
            render_events(&mut events);
        }
        "save" => {
            let found = matches!(app.lookup(&word).await?, LookupState::Success(_));
            if found {
                app.save_current().await?;
            }
            render_events(&mut events);
        }
        "download" => {
            let state = app.lookup(&word).await?.clone();
            if let LookupState::Success(view) = state {
                if view.has_audio() {
                    let client = reqwest::Client::new();
                    let path = app
                        .audio()
                        .download(&client, Path::new("."), &view.word)
                        .await?;
                    println!("💾 Saved pronunciation to {}", path.display());
                } else {
                    println!("🔇 No pronunciation available for \"{}\"", view.word);
                }
            }
            render_events(&mut events);
        }
        "history" => {
            let history = app.history().await?;
            if history.is_empty() {
                println!("No saved words yet.");
            }
            for (i, word) in history.iter().enumerate() {
                println!("{:>3}. {}", i + 1, word);
            }
        }
        "clear-history" => {
            app.clear_history().await?;
            render_events(&mut events);
        }
        "recent" => {
            println!("🕘 Recent searches: {}", app.recent_searches().await?.join(", "));
        }
        "daily" => {
            if let Some(record) = app.store().daily_word().await? {
                println!("📅 Word of the day ({}): {}", record.date, record.word);
            }
        }
        "theme" => {
            app.toggle_theme().await?;
            render_events(&mut events);
        }
        "quiz" => run_quiz(&mut app, config.quiz_round_delay).await?,
        _ => unreachable!("mode checked above"),
    }

    Ok(())
}

fn print_usage() {
    println!("📖 Word Lens - dictionary lookups\n");
    println!("💡 Available modes:");
    println!("   cargo run -- serve           - Run the lookup proxy");
    println!("   cargo run -- lookup <word>   - Look up a word");
    println!("   cargo run -- save <word>     - Look up a word and save it to history");
    println!("   cargo run -- download <word> - Save a word's pronunciation as <word>.mp3");
    println!("   cargo run -- history         - List saved words");
    println!("   cargo run -- clear-history   - Forget saved words");
    println!("   cargo run -- recent          - List recent searches");
    println!("   cargo run -- daily           - Show the word of the day");
    println!("   cargo run -- theme           - Toggle light/dark theme");
    println!("   cargo run -- quiz            - Play the vocabulary quiz");
}

/// Print whatever the app announced since the last call
fn render_events(events: &mut broadcast::Receiver<AppEvent>) {
    for event in drain_events(events) {
        match event {
            AppEvent::ThemeChanged(theme) => println!("🎨 Theme: {}", theme),
            AppEvent::DailyWord(card) => {
                println!("✨ Word of the day: {} - {}\n", card.word, card.definition)
            }
            AppEvent::LookupStarted(word) => println!("🔍 Searching \"{}\"...", word),
            AppEvent::LookupFailed(message) => println!("❌ {}", message),
            AppEvent::Toast(message) => println!("✅ {}", message),
            AppEvent::RecentSearchesChanged(recent) => {
                println!("\n🕘 Recent: {}", recent.join(", "))
            }
            AppEvent::HistoryChanged(_) | AppEvent::LookupSucceeded(_) => {}
        }
    }
}

fn print_result(view: &ResultView, audio: &AudioTransport) {
    println!("\n{}  {}", view.word, view.phonetic);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    if let Some(pos) = &view.part_of_speech {
        println!("({})", pos);
    }
    println!("{}", view.definition);
    println!("\nSynonyms: {}", view.synonyms_text());
    println!("Antonyms: {}", view.antonyms_text());
    if let Some(source) = audio.source() {
        println!("\n🔊 {} ({})", source, audio.speed_label());
    }
}

async fn run_quiz(app: &mut App, delay: Duration) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        app.quiz().start();
        println!("🧠 Guess the word from its definition!");

        while let Some(definition) = app.quiz().current_definition() {
            let round = app.quiz().round_index() + 1;
            let total = app.quiz().total();
            print!("\n❓ {}/{}: {}\n> ", round, total, definition);
            std::io::stdout().flush()?;

            let Some(guess) = lines.next_line().await? else {
                app.quiz().exit();
                return Ok(());
            };

            let answered = app.quiz().answer(&guess, delay).await?;
            if answered.correct {
                println!("✅ Correct!");
            } else {
                println!("❌ The word was \"{}\"", answered.question.word);
            }
        }

        if app.quiz().state() == QuizState::Complete {
            if let Some(summary) = app.quiz().summary() {
                println!("\n🏁 Final score: {}", summary.score_label());
                for (i, round) in summary.rounds.iter().enumerate() {
                    let mark = if round.correct { "✅" } else { "❌" };
                    println!(
                        "{:>3}. {} {} (you said \"{}\")",
                        i + 1,
                        mark,
                        round.question.word,
                        round.answer
                    );
                }
            }
        }

        print!("\nPlay again? [y/N] ");
        std::io::stdout().flush()?;
        match lines.next_line().await? {
            Some(answer) if answer.trim().eq_ignore_ascii_case("y") => continue,
            _ => break,
        }
    }

    app.quiz().exit();
    Ok(())
}
