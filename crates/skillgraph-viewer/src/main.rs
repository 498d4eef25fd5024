mod cli;

use anyhow::{Context, Result};
use skillgraph_viewer::data::load_dataset;
use skillgraph_viewer::util::config;
use skillgraph_viewer::{EventQueue, GraphState, Interaction};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();
    let args = cli::parse_args()?;

    let mut cfg = match &args.config {
        Some(path) => config::load_or_default_from_path(path),
        None => config::load_or_default(),
    };
    if let Some(mode) = args.mode {
        cfg.layout_mode = mode;
    }
    if args.write_config {
        match &args.config {
            Some(path) => config::save_to_path(&cfg, path)?,
            None => config::save(&cfg)?,
        }
    }

    // Nothing is drawn unless all three sheets load.
    let data = load_dataset(&args.paths)
        .await
        .context("failed to load graph data")?;

    let mut st = GraphState::new(cfg);
    st.load(data);

    let queue = EventQueue::default();
    for id in args.expand {
        queue.post(Interaction::SetExpanded(id, true));
    }
    for id in args.collapse {
        queue.post(Interaction::SetExpanded(id, false));
    }
    if let Some(query) = args.search {
        queue.post(Interaction::Search(query));
    }
    if let Some(id) = args.select {
        queue.post(Interaction::Select(id));
    }
    let outcome = queue.pump(&mut st);
    tracing::info!(
        applied = outcome.applied,
        notices = outcome.notices.len(),
        recomputed = outcome.recomputed,
        "interactions applied"
    );

    for hit in &st.ui.search_hits {
        let label = st
            .tree(hit.graph)
            .get(&hit.id)
            .map(|n| n.record.label.as_str())
            .unwrap_or_default();
        tracing::info!(graph = hit.graph.display_name(), id = %hit.id, label, "search hit");
    }

    let scene = st.scene();
    let json = serde_json::to_string_pretty(&scene).context("failed to encode scene")?;
    match args.out {
        Some(path) => tokio::fs::write(&path, json)
            .await
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{json}"),
    }
    Ok(())
}
