//! Prints every section of every daily note.
//!
//! Notes are read from the `Daily` directory below `notes_config.base_path`
//! of the configuration file.

use arrrg::CommandLine;
use arrrg_derive::CommandLine;

use vtwo::DailyNotes;
use vtwo::chat::UserConfig;

#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
struct NotesArgs {
    #[arrrg(optional, "Config file (default: ~/.v2/config.json)", "PATH")]
    config: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    vtwo::logging::init();
    let (args, _) = NotesArgs::from_command_line_relaxed("vtwo-notes [OPTIONS]");
    let config = UserConfig::load_from(args.config.as_deref())?;

    let notes = DailyNotes::new(&config.notes.base_path);
    for chunk in notes.load()? {
        println!("{chunk}\n");
    }
    Ok(())
}
