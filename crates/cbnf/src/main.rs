use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use cbnf_errors::Renderer;
use clap::Parser;

#[derive(Parser)]
#[command(about = "Inspect CBNF grammar files")]
enum Options {
    /// Report lexical and syntax errors.
    Check {
        path: Utf8PathBuf,
        /// Render snippets without colors.
        #[arg(long)]
        plain: bool,
    },
    /// Print the syntax tree.
    Tree { path: Utf8PathBuf },
}

fn read(path: &Utf8Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read `{path}`"))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    match Options::parse() {
        Options::Check { path, plain } => {
            let text = read(&path)?;
            let parse = cbnf_parse::parse(&text);

            let renderer = if plain { Renderer::plain() } else { Renderer::styled() };
            for diagnostic in parse.diagnostics() {
                eprintln!("{}", diagnostic.render(&renderer, path.as_str(), &text));
            }

            let count = parse.diagnostics().len();
            if count > 0 {
                anyhow::bail!("`{path}` has {count} error(s)");
            }

            log::info!("`{path}`: {} rules", parse.syntax().rules().count());
            Ok(())
        }
        Options::Tree { path } => {
            let text = read(&path)?;
            print!("{}", cbnf_parse::parse(&text).debug_dump());
            Ok(())
        }
    }
}
