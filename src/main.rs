//! me - a minimal terminal text editor
//! Main entry point

use anyhow::Context;
use me::editor::Editor;
use me::term::crossterm::CrosstermBackend;

fn main() -> anyhow::Result<()> {
    let file_path = std::env::args().nth(1);

    let backend = CrosstermBackend::new().context("failed to create terminal backend")?;

    let mut editor = match &file_path {
        Some(path) => Editor::with_file(backend, Some(path.clone()))
            .with_context(|| format!("failed to open {path}"))?,
        None => Editor::new(backend).context("failed to initialize editor")?,
    };

    editor.run().context("editor error")?;
    Ok(())
}
