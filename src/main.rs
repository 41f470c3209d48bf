// src/main.rs
//
// Calculatrice graphique: point d’entrée NATIF
// ---------------------------------------------
// - journal (simplelog) installé avant la première frame
// - eframe::run_native + NativeOptions
//
// IMPORTANT (structure projet):
// - `impl eframe::App for AppCalc` vit dans src/app.rs
// - Ici: point d’entrée seulement

use eframe::egui;
use log::{info, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

mod app;
mod noyau;

use app::AppCalc;

const TITRE_APP: &str = "Calculatrice graphique";

fn installer_journal() {
    // un autre journal déjà installé n’est pas une erreur
    let _ = TermLogger::init(
        LevelFilter::Info,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    );
}

fn main() -> eframe::Result<()> {
    installer_journal();
    info!("{TITRE_APP} : démarrage");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(TITRE_APP)
            .with_inner_size([560.0, 760.0])
            .with_min_inner_size([440.0, 620.0]),
        ..Default::default()
    };

    eframe::run_native(
        TITRE_APP,
        options,
        Box::new(|_cc| Ok(Box::<AppCalc>::default())),
    )
}
