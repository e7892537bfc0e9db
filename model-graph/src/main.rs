use anyhow::Result;
use itertools::Itertools as _;
use model_config::ModuleEx as _;
use model_graph::{Graph, InputKeys};
use prettytable::{cell, row, Table};
use std::path::{Path, PathBuf};
use structopt::StructOpt;

fn main() -> Result<()> {
    #[derive(Debug, Clone, StructOpt)]
    enum Args {
        /// Print the nodes and outputs of a graph file
        Info {
            /// graph JSON file
            graph_file: PathBuf,
        },
    }

    match Args::from_args() {
        Args::Info { graph_file } => {
            info(graph_file)?;
        }
    }

    Ok(())
}

fn info(graph_file: impl AsRef<Path>) -> Result<()> {
    let graph = Graph::open(graph_file)?;

    // print layer information
    {
        let mut table = Table::new();
        table.add_row(row!["key", "kind", "name", "input", "output shape"]);

        graph.nodes().iter().for_each(|(&key, node)| {
            let input = match node.input_keys {
                InputKeys::PlaceHolder => "-".to_string(),
                InputKeys::Single(src_key) => src_key.to_string(),
            };

            table.add_row(row![
                key,
                node.config.as_ref(),
                node.config.name(),
                input,
                node.output_shape,
            ]);
        });

        table.printstd();
    }

    // print outputs
    {
        let outputs = graph
            .outputs()
            .iter()
            .map(|(name, key)| format!("{} <- {}", name, key))
            .join(", ");
        println!("outputs: {}", outputs);
    }

    Ok(())
}
