// SPDX-FileCopyrightText: 2026 Partpal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Terminal rendering of transcript turns.
//!
//! Rendering is pure: a turn becomes a block of text. Audio clips are not
//! playable in a terminal, so [`AudioStore`] writes them to disk and the
//! rendered block points at the file.

use std::path::{Path, PathBuf};

use colored::Colorize;
use partpal_core::{PartResult, Turn};

/// Label printed before user text.
pub const USER_LABEL: &str = "you";

/// Writes synthesized audio clips to a directory, one file per turn.
#[derive(Debug, Clone)]
pub struct AudioStore {
    dir: PathBuf,
    extension: String,
}

impl AudioStore {
    pub fn new(dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path the audio of the turn at `index` is written to.
    pub fn clip_path(&self, index: usize) -> PathBuf {
        self.dir
            .join(format!("turn-{:04}.{}", index + 1, self.extension))
    }

    /// Writes `audio` for the turn at `index`, creating the directory.
    pub async fn save(&self, index: usize, audio: &[u8]) -> std::io::Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.clip_path(index);
        tokio::fs::write(&path, audio).await?;
        Ok(path)
    }
}

/// Renders one turn as display text.
///
/// `audio_path` is where the turn's clip was saved; it is ignored for
/// turns without audio.
pub fn render_turn(
    turn: &Turn,
    assistant_name: &str,
    audio_path: Option<&Path>,
    use_color: bool,
) -> String {
    let mut lines = Vec::new();

    if let Some(user) = turn.user() {
        let label = if use_color {
            USER_LABEL.cyan().bold().to_string()
        } else {
            USER_LABEL.to_string()
        };
        lines.push(format!("{label}> {user}"));
    }

    let assistant = turn.assistant();
    if let Some(body) = assistant.body() {
        let label = if use_color {
            assistant_name.green().bold().to_string()
        } else {
            assistant_name.to_string()
        };
        lines.push(format!("{label}> {body}"));
    }

    for (i, part) in assistant.parts().iter().enumerate() {
        lines.push(render_part(i + 1, part, use_color));
    }

    if let (Some(path), Some(bytes)) = (audio_path, turn.audio()) {
        let note = format!("[audio: {}, {} bytes]", path.display(), bytes.len());
        lines.push(if use_color {
            note.dimmed().to_string()
        } else {
            note
        });
    }

    lines.join("\n")
}

/// Renders one catalog hit as an indented card line.
pub fn render_part(position: usize, part: &PartResult, use_color: bool) -> String {
    let identifier = if use_color {
        part.identifier.yellow().bold().to_string()
    } else {
        part.identifier.clone()
    };
    let mut line = format!(
        "  {position}. {identifier} | {} | {}",
        part.description, part.price
    );
    if part.has_link() {
        line.push_str(" | ");
        line.push_str(&part.link);
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use partpal_core::AssistantPayload;

    fn part(id: &str, link: &str) -> PartResult {
        PartResult::from_upstream(
            Some(id.into()),
            Some("8-bit MCU".into()),
            Some("$2.89".into()),
            Some(link.into()),
        )
    }

    #[test]
    fn renders_user_and_assistant_text() {
        let turn = Turn::new(
            Some("blink an LED".into()),
            AssistantPayload::text("Use a 220 ohm resistor."),
            None,
        );
        assert_eq!(
            render_turn(&turn, "partpal", None, false),
            "you> blink an LED\npartpal> Use a 220 ohm resistor."
        );
    }

    #[test]
    fn renders_parts_only_turn_as_cards() {
        let turn = Turn::assistant_only(AssistantPayload::parts_only(vec![
            part("ATMEGA328P-PU", "https://mouser.com/a"),
            part("ATMEGA328P-AU", ""),
        ]));
        let out = render_turn(&turn, "partpal", None, false);
        assert_eq!(
            out,
            "  1. ATMEGA328P-PU | 8-bit MCU | $2.89 | https://mouser.com/a\n  2. ATMEGA328P-AU | 8-bit MCU | $2.89"
        );
    }

    #[test]
    fn renders_audio_note() {
        let turn = Turn::new(
            Some("image uploaded".into()),
            AssistantPayload::text("Identified: LM7805"),
            Some(vec![1, 2, 3]),
        );
        let out = render_turn(&turn, "partpal", Some(Path::new("/tmp/turn-0001.mp3")), false);
        assert!(
            out.ends_with("[audio: /tmp/turn-0001.mp3, 3 bytes]"),
            "got: {out}"
        );
    }

    #[test]
    fn clip_paths_are_one_based() {
        let store = AudioStore::new("/tmp/partpal", "mp3");
        assert_eq!(
            store.clip_path(0),
            PathBuf::from("/tmp/partpal/turn-0001.mp3")
        );
    }

    #[tokio::test]
    async fn save_creates_directory_and_writes_clip() {
        let tmp = tempfile::tempdir().unwrap();
        let store = AudioStore::new(tmp.path().join("audio"), "mp3");
        let path = store.save(2, &[9, 9, 9]).await.unwrap();
        assert_eq!(path, tmp.path().join("audio").join("turn-0003.mp3"));
        assert_eq!(std::fs::read(&path).unwrap(), vec![9, 9, 9]);
    }
}
