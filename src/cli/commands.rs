//! Command dispatch

use std::io::{self, Read};
use std::path::Path;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::application::services::{DocumentService, TreeStats};
use crate::application::ApplicationError;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings, TreeStyle};
use crate::domain::tree_traits::to_termtree;
use crate::domain::{flatten, render_tree, Block, BlockTree, DomainError, NodeId};
use crate::infrastructure::{InfraError, ServiceContainer};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage(
            "no command given, see `blocktree --help`".to_string(),
        ));
    };

    let settings = Settings::load(cli.config.as_deref())?;
    let container = ServiceContainer::new(settings);

    match command {
        Commands::Tree { file, from, style } => {
            _tree(&container, file, from.as_deref(), *style)
        }
        Commands::Flatten {
            file,
            from,
            compact,
            output,
        } => _flatten(&container, file, from.as_deref(), *compact, output.as_deref()),
        Commands::Stats { file } => _stats(&container, file),
        Commands::Config { command } => _config(&container, cli.config.as_deref(), command),
        Commands::Completion { shell } => _completion(*shell),
    }
}

/// Load the tree from `file`, or from stdin for `-`.
fn load_tree(container: &ServiceContainer, file: &Path) -> CliResult<BlockTree<Block>> {
    if file == Path::new("-") {
        let mut content = String::new();
        io::stdin()
            .read_to_string(&mut content)
            .map_err(|e| InfraError::io("read blocks from stdin", e))?;
        let blocks = DocumentService::parse_blocks(&content, "stdin")?;
        return Ok(BlockTree::from_blocks(blocks));
    }
    Ok(container.document_service.build(file)?)
}

#[instrument(skip(container))]
fn _tree(
    container: &ServiceContainer,
    file: &Path,
    from: Option<&str>,
    style: Option<TreeStyle>,
) -> CliResult<()> {
    let tree = load_tree(container, file)?;
    let from = from.map(NodeId::new);
    let start = DocumentService::start_node(&tree, from.as_ref())?;
    let node = tree
        .node(start)
        .ok_or_else(|| ApplicationError::from(DomainError::UnknownNode(NodeId::root())))?;

    let style = style.unwrap_or(container.settings.print.style);
    debug!("rendering {} nodes as {}", tree.len(), style);
    match style {
        TreeStyle::Plain => print!("{}", render_tree(&node, 0)),
        TreeStyle::Unicode => print!("{}", to_termtree(&node, container.settings.print.show_ids)),
    }
    Ok(())
}

#[instrument(skip(container))]
fn _flatten(
    container: &ServiceContainer,
    file: &Path,
    from: Option<&str>,
    compact: bool,
    target: Option<&Path>,
) -> CliResult<()> {
    let tree = load_tree(container, file)?;
    let from = from.map(NodeId::new);
    let start = DocumentService::start_node(&tree, from.as_ref())?;
    let blocks = flatten(&tree, start);
    let pretty = container.settings.output.pretty && !compact;

    match target {
        Some(path) => {
            container.document_service.save(path, &blocks, pretty)?;
            output::action("Written", &path.display());
        }
        None => output::info(&DocumentService::to_json(&blocks, pretty)?),
    }
    Ok(())
}

#[instrument(skip(container))]
fn _stats(container: &ServiceContainer, file: &Path) -> CliResult<()> {
    let tree = load_tree(container, file)?;
    let stats = TreeStats::from_tree(&tree);

    output::header(&file.display());
    output::field("nodes", &stats.nodes);
    output::field("depth", &stats.depth);
    output::field("leaves", &stats.leaves);
    output::field("temporary ids", &stats.temporary_ids);
    Ok(())
}

#[instrument(skip(container))]
fn _config(
    container: &ServiceContainer,
    explicit: Option<&Path>,
    command: &ConfigCommands,
) -> CliResult<()> {
    match command {
        ConfigCommands::Show => output::info(&container.settings.to_toml()?),
        ConfigCommands::Template => output::info(&Settings::template()),
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => {
                    let state = if container.fs.exists(&path) {
                        "exists"
                    } else {
                        "not found"
                    };
                    output::field("global", &format!("{} ({})", path.display(), state));
                }
                None => output::field("global", "no config directory"),
            }
            if let Some(path) = explicit {
                output::field("explicit", &path.display());
            }
        }
    }
    Ok(())
}

fn _completion(shell: Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
