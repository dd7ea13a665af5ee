use log::info;

use rs_hal_core::{Model, Snapshot};

const LINES: [&str; 8] = [
    "the cat sat on the mat",
    "the dog slept on the rug",
    "a cat and a dog are friends",
    "my cat likes warm milk",
    "where did the dog go?",
    "the rug is warm",
    "do you like milk?",
    "cats and dogs",
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Set RUST_LOG=debug to see anchor selection, trace for each generation step
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Order 2: every prefix is a window of two tokens (ex. "cat", " ")
    let mut model = Model::with_seed(2, 2024)?;

    // Cap replies at 40 tokens (words and whitespace runs both count)
    model.settings_mut().set_max_tokens(40)?;

    // Each line first gets a reply built from what was known before it,
    // then is learnt
    for line in LINES {
        let reply = model.add(line);
        println!("> {}\n< {}", line, reply);
    }

    // The learned state can be stored anywhere as JSON (or postcard bytes)
    let json = model.to_snapshot().to_json()?;
    info!("snapshot: {} bytes of JSON, {} prefixes", json.len(), model.prefix_count());

    // Loading into a model of another order is refused
    match Model::from_snapshot(Snapshot::from_json(&json)?, 3) {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("Refused: {}", e),
    }

    // Same order: the restored model knows everything the first one learnt
    let mut restored = Model::from_snapshot(Snapshot::from_json(&json)?, 2)?;
    for line in ["warm milk", "the dog", "friends"] {
        println!("> {}\n< {}", line, restored.add(line));
    }

    Ok(())
}
