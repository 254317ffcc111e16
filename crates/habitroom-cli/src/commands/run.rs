use std::borrow::Cow;

use habitroom_core::{Config, DashboardRuntime, Event, Intent};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::{RecvError, TryRecvError};

use super::live_dashboard;
use crate::render::Renderer;

const HELP: &str = "\
commands:
  start | pause | toggle | reset      pomodoro controls
  water | medicine | walk             log a habit
  task add [low|medium|high] <text>   add a task
  task toggle <id-prefix>             mark a task done/undone
  task rm <id-prefix>                 delete a task
  status | tasks | motivate | help    show things
  quit                                exit";

pub fn run(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    rt.block_on(run_loop(config))
}

async fn run_loop(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let renderer = Renderer::new(config.display.clock_format);
    let mut runtime = DashboardRuntime::spawn(live_dashboard(config.reminders.seed));
    let mut events = runtime.subscribe();
    // Raw segments rather than `lines()`: one undecodable line must not end
    // the session.
    let mut lines = BufReader::new(tokio::io::stdin()).split(b'\n');

    println!("{}", renderer.status(&runtime.snapshot()));
    if config.display.show_motivation {
        println!("{}", runtime.motivational_message());
    }
    println!("type 'help' for commands");

    loop {
        tokio::select! {
            segment = lines.next_segment() => {
                let Some(segment) = segment? else { break };
                let decoded = String::from_utf8_lossy(&segment);
                if let Cow::Owned(_) = decoded {
                    tracing::warn!("input line was not valid UTF-8");
                }
                let line = decoded.trim();
                match line {
                    "" => {}
                    "quit" | "exit" => break,
                    "help" => println!("{HELP}"),
                    "status" => println!("{}", renderer.status(&runtime.snapshot())),
                    "tasks" => println!("{}", runtime.read(|d| renderer.tasks(d.tasks()))),
                    "motivate" => println!("{}", runtime.motivational_message()),
                    _ => match line.parse::<Intent>().and_then(|i| runtime.apply(i)) {
                        Ok(applied) if applied.is_empty() => println!("nothing to do"),
                        Ok(_) => {}
                        Err(e) => eprintln!("error: {e}"),
                    },
                }
            }
            event = events.recv() => match event {
                Ok(event) => print_event(&renderer, &event),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "event printer fell behind");
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    // Show whatever was published before the last command.
    loop {
        match events.try_recv() {
            Ok(event) => print_event(&renderer, &event),
            Err(TryRecvError::Lagged(_)) => continue,
            Err(_) => break,
        }
    }

    let cancelled = runtime.shutdown();
    tracing::info!(cancelled, "dashboard stopped");
    Ok(())
}

fn print_event(renderer: &Renderer, event: &Event) {
    if let Some(line) = renderer.event(event) {
        println!("{line}");
    }
}
