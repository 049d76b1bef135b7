use std::io::Read;
use colored::Colorize;
use dn_network::InitialSystem;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Strand notation from a file, or from stdin.
    let text = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let system = InitialSystem::from_text(&text)?;
    let network = system.network();
    println!("{} species over {} strand types.", network.len(), system.strand_types());
    println!("--");

    for species in network.species() {
        let id = species.id().map_or_else(|| "-".to_string(), |id| id.to_string());
        println!("{:>4} {}", id.bold(), species.canonical_form().green());
        let graph = species.bond_graph()?;
        for (v, strand) in species.strands().iter().enumerate() {
            let hidden: Vec<String> = (0..strand.len())
                .filter(|&d| graph.is_hidden(v, d))
                .map(|d| d.to_string())
                .collect();
            if hidden.is_empty() {
                println!("     {strand}");
            } else {
                println!("     {strand} {}", format!("hidden: {}", hidden.join(",")).dimmed());
            }
        }
        if !graph.loops().is_empty() {
            println!("     {}", format!("{} loop(s)", graph.loops().len()).yellow());
        }
    }
    println!("--");

    Ok(())
}
