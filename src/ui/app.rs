use std::io::{self, Write};

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::chat::{ChatSession, SubmitOutcome};
use crate::storage::ProfileStore;

use super::components::chat_area;
use super::components::input_bar::{self, InputAction};

/// Line-based chat front end.
pub struct ChatApp {
    session: ChatSession,
    profile: ProfileStore,
}

impl ChatApp {
    pub fn new(session: ChatSession, profile: ProfileStore) -> Self {
        Self { session, profile }
    }

    pub async fn run(mut self) -> io::Result<()> {
        self.print_transcript()?;
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            print!("> ");
            io::stdout().flush()?;

            let Some(line) = lines.next_line().await? else {
                break;
            };
            match input_bar::parse(&line) {
                None => continue,
                Some(InputAction::Quit) => break,
                Some(InputAction::Reset) => {
                    self.session.reset();
                    self.print_transcript()?;
                }
                Some(InputAction::Send(prompt)) => self.send(&prompt).await?,
            }
        }

        log::info!("Chat closed");
        Ok(())
    }

    async fn send(&mut self, prompt: &str) -> io::Result<()> {
        match self.session.submit(prompt, &self.profile).await {
            Ok(SubmitOutcome::Streaming) => {
                let mut stdout = io::stdout();
                write!(stdout, "guide: ")?;
                while let Some(update) = self.session.next_update().await {
                    write!(stdout, "{}", chat_area::render_update(&update))?;
                    stdout.flush()?;
                }
            }
            Ok(SubmitOutcome::Ignored) => {}
            Err(_) => {
                if let Some(message) = self.session.transcript().last() {
                    println!("{}", chat_area::render_message(message));
                }
            }
        }
        Ok(())
    }

    fn print_transcript(&self) -> io::Result<()> {
        let mut stdout = io::stdout();
        for message in self.session.transcript().messages() {
            writeln!(stdout, "{}", chat_area::render_message(message))?;
        }
        Ok(())
    }
}
