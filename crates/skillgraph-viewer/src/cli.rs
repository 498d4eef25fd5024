use anyhow::Result;
use skillgraph_core::NodeId;
use std::ffi::OsString;
use std::path::PathBuf;

use skillgraph_viewer::data::DataPaths;
use skillgraph_viewer::util::config::LayoutMode;

#[derive(Debug, Clone)]
pub struct CliArgs {
    pub paths: DataPaths,
    pub mode: Option<LayoutMode>,
    pub expand: Vec<NodeId>,
    pub collapse: Vec<NodeId>,
    pub select: Option<NodeId>,
    pub search: Option<String>,
    pub out: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub write_config: bool,
}

pub fn parse_args() -> Result<CliArgs> {
    parse_args_from(std::env::args_os().skip(1))
}

fn node_id(value: OsString) -> NodeId {
    NodeId(value.to_string_lossy().trim().to_ascii_uppercase())
}

fn parse_args_from<I>(args: I) -> Result<CliArgs>
where
    I: IntoIterator<Item = OsString>,
{
    let mut knowledge = None;
    let mut ability = None;
    let mut mappings = None;
    let mut mode = None;
    let mut expand = Vec::new();
    let mut collapse = Vec::new();
    let mut select = None;
    let mut search = None;
    let mut out = None;
    let mut config = None;
    let mut write_config = false;
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        let Some(flag) = arg.to_str() else {
            anyhow::bail!("unknown argument: {:?}", arg);
        };
        if flag == "--write-config" {
            write_config = true;
            continue;
        }
        let Some(value) = args.next() else {
            anyhow::bail!("{flag} expects a value");
        };
        match flag {
            "--knowledge" => knowledge = Some(PathBuf::from(value)),
            "--ability" => ability = Some(PathBuf::from(value)),
            "--mappings" => mappings = Some(PathBuf::from(value)),
            "--mode" => mode = Some(LayoutMode::parse(&value.to_string_lossy())?),
            "--expand" => expand.push(node_id(value)),
            "--collapse" => collapse.push(node_id(value)),
            "--select" => select = Some(node_id(value)),
            "--search" => search = Some(value.to_string_lossy().to_string()),
            "--out" => out = Some(PathBuf::from(value)),
            "--config" => config = Some(PathBuf::from(value)),
            _ => anyhow::bail!("unknown argument: {flag}"),
        }
    }

    let (Some(knowledge), Some(ability), Some(mappings)) = (knowledge, ability, mappings) else {
        anyhow::bail!("--knowledge, --ability and --mappings are all required");
    };

    Ok(CliArgs {
        paths: DataPaths {
            knowledge,
            ability,
            mappings,
        },
        mode,
        expand,
        collapse,
        select,
        search,
        out,
        config,
        write_config,
    })
}
