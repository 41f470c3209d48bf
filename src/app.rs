// src/app.rs
//
// Calculatrice graphique: module App (racine)
// --------------------------------------------
// Rôle:
// - Déclarer les sous-modules (etat.rs + vue.rs)
// - Ré-exporter AppCalc (pour main.rs: use crate::app::AppCalc;)
// - Fournir l’impl eframe::App
//
// Important:
// - Enter est géré dans vue.rs (quand le champ a le focus).
// - Une tâche de tracé en cours est sondée à chaque frame ; on redemande
//   une frame tant qu’elle n’a pas livré son issue.

pub mod etat;
pub mod vue;

// Ré-export pratique : `use crate::app::AppCalc;`
pub use etat::AppCalc;

use std::time::Duration;

use eframe::egui;

/// Intervalle de sondage d’une tâche de tracé.
const SONDAGE_TRACE: Duration = Duration::from_millis(50);

impl eframe::App for AppCalc {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ESC = effacer seulement l’entrée (comme bouton "C").
        let esc = ctx.input(|i| i.key_pressed(egui::Key::Escape));
        if esc {
            self.clear_entree();
        }

        if self.sonder_trace() {
            ctx.request_repaint_after(SONDAGE_TRACE);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            self.ui(ui);
        });
    }
}
