use std::error::Error;

use dialoguer::Input;

use blackjack_sim::{config::SimulationConfig, loader, Narrator, Summary};

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = SimulationConfig::load()?;
    // Strategies are read before asking anything so a bad table fails fast.
    let mut game = loader::build_game(&config)?;

    let rounds: u64 = Input::new()
        .with_prompt("How many rounds do you want to try? (ex: 10000)")
        .validate_with(|rounds: &u64| -> Result<(), String> {
            if *rounds == 0 {
                return Err(String::from("Enter at least one round"));
            }
            Ok(())
        })
        .interact_text()?;

    let mut narrator = Narrator::new(&game);
    game.run(rounds, &mut narrator, |done, total| {
        log::info!("{done}/{total} rounds played");
    })?;

    let summary = Summary::from_game(&game);
    print!("{summary}");
    narrator.append_summary(&summary);
    narrator.write_to(&config.report_path)?;
    println!("log written to {}", config.report_path.display());
    Ok(())
}
