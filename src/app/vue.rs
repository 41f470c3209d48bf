// src/app/vue.rs
//
// Vue (UI egui)
// -------------
// Objectifs :
// - Clavier : Enter évalue (quand le champ est focus)
// - Réglages : base d’affichage (DEC/HEX/BIN), longueur de ligne
// - Tracé : domaine / plage / zoom, lancer / annuler, état et nombre de points
//   (le dessin de la courbe n’est pas fait ici)
//
// Note :
// - PAS de Key::NumEnter (n’existe pas dans egui 0.33.x)

use eframe::egui;

use super::etat::{AppCalc, LONGUEUR_LIGNE_MAX, LONGUEUR_LIGNE_MIN};
use crate::noyau::{egal, Base, EtatTache, Issue};

impl AppCalc {
    /// UI principale : à appeler depuis eframe::App::update(...)
    pub fn ui(&mut self, ui: &mut egui::Ui) {
        ui.spacing_mut().item_spacing = egui::vec2(6.0, 6.0);

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.heading("Calculatrice graphique");
                ui.add_space(6.0);

                self.ui_entree(ui);

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                self.ui_resultat(ui);

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                self.ui_trace(ui);
            });
    }

    fn ui_entree(&mut self, ui: &mut egui::Ui) {
        ui.label("Entrée :");

        let resp = ui.add(
            egui::TextEdit::singleline(&mut self.entree)
                .desired_width(ui.available_width())
                .hint_text("Ex: 2+3i, sqrt(-4), y=x^2, x^2+y^2=4")
                .id_source("entree_edit")
                .code_editor(),
        );

        if self.focus_entree {
            resp.request_focus();
            self.focus_entree = false;
        }

        let enter = ui.input(|i| i.key_pressed(egui::Key::Enter));
        if resp.has_focus() && enter {
            self.evaluer();
        }

        ui.add_space(6.0);

        // Actions + réglages
        ui.horizontal(|ui| {
            // Contrat: C = entrée seulement ; CLR = résultats seulement ; AC = tout
            self.bouton_action(ui, "C", "Efface seulement l’entrée", Action::ClearEntree);
            self.bouton_action(ui, "CLR", "Efface résultat + erreur", Action::ClearResultats);
            self.bouton_action(ui, "AC", "Remise à zéro totale", Action::ResetTotal);

            ui.separator();

            let mut base = self.base;
            for b in [Base::Decimal, Base::Hexadecimal, Base::Binaire] {
                ui.selectable_value(&mut base, b, b.nom());
            }
            if base != self.base {
                self.set_base(base);
                self.focus_entree = true;
            }

            ui.separator();

            let mut longueur = self.longueur_ligne as u32;
            let resp = ui.add(
                egui::DragValue::new(&mut longueur)
                    .speed(1)
                    .range(LONGUEUR_LIGNE_MIN as u32..=LONGUEUR_LIGNE_MAX as u32)
                    .suffix(" car."),
            );
            if resp.changed() {
                self.set_longueur_ligne(longueur as usize);
            }

            let mut arabes = self.chiffres_arabes;
            if ui.checkbox(&mut arabes, "٠١٢").changed() {
                self.set_chiffres_arabes(arabes);
            }
        });

        ui.add_space(8.0);

        // Touches rapides + variables + "="
        ui.horizontal_wrapped(|ui| {
            self.bouton_insert(ui, "(", "(", InsertKind::OpenParen);
            self.bouton_insert(ui, ")", ")", InsertKind::CloseParen);

            self.bouton_insert(ui, "+", "+", InsertKind::Op);
            self.bouton_insert(ui, "−", "−", InsertKind::Op);
            self.bouton_insert(ui, "×", "×", InsertKind::Op);
            self.bouton_insert(ui, "÷", "÷", InsertKind::Op);
            self.bouton_insert(ui, "^", "^", InsertKind::Op);

            ui.separator();

            self.bouton_insert(ui, "π", "π", InsertKind::Word);
            self.bouton_insert(ui, "e", "e", InsertKind::Word);
            self.bouton_insert(ui, "i", "i", InsertKind::Word);
            self.bouton_insert(ui, "√", "√(", InsertKind::Func);
            self.bouton_insert(ui, "sin", "sin(", InsertKind::Func);
            self.bouton_insert(ui, "cos", "cos(", InsertKind::Func);
            self.bouton_insert(ui, "tan", "tan(", InsertKind::Func);
            self.bouton_insert(ui, "ln", "ln(", InsertKind::Func);

            ui.separator();

            self.bouton_insert(ui, "x", "x", InsertKind::Word);
            self.bouton_insert(ui, "y", "y", InsertKind::Word);
            self.bouton_insert(ui, "=", "=", InsertKind::Op);

            ui.add_space(10.0);

            let eq = ui.add_sized([64.0, 32.0], egui::Button::new("Calculer"));
            if eq.clicked() {
                self.evaluer();
            }
        });

        ui.add_space(8.0);

        self.ui_pave_numerique(ui);

        if !self.erreur.is_empty() {
            ui.add_space(6.0);
            ui.colored_label(ui.visuals().error_fg_color, &self.erreur);
        }
    }

    fn ui_pave_numerique(&mut self, ui: &mut egui::Ui) {
        let radix = self.base.radix();
        let actif = |c: char| c.to_digit(16).is_some_and(|d| d < radix);

        egui::Grid::new("pave_numerique")
            .num_columns(4)
            .spacing([6.0, 6.0])
            .show(ui, |ui| {
                for ligne in PAVE {
                    for c in ligne {
                        let texte = c.to_string();
                        ui.add_enabled_ui(actif(c), |ui| {
                            self.bouton_insert(ui, &texte, &texte, InsertKind::Digit);
                        });
                    }
                    ui.end_row();
                }

                self.bouton_insert(ui, ".", ".", InsertKind::Digit);
                self.bouton_action(ui, "DEL", "Efface le dernier symbole", Action::Backspace);
                ui.label("");
                ui.label("");
                ui.end_row();
            });
    }

    /// Backspace “intelligent” : retire d’un coup les motifs utiles ("sin(", "√(", etc.).
    fn backspace_entree(&mut self) {
        while self.entree.ends_with(' ') {
            self.entree.pop();
        }

        for pat in ["sin(", "cos(", "tan(", "ln(", "√("] {
            if self.entree.ends_with(pat) {
                for _ in 0..pat.chars().count() {
                    self.entree.pop();
                }
                while self.entree.ends_with(' ') {
                    self.entree.pop();
                }
                return;
            }
        }

        self.entree.pop();
        while self.entree.ends_with(' ') {
            self.entree.pop();
        }
    }

    fn ui_resultat(&mut self, ui: &mut egui::Ui) {
        ui.label(format!("Résultat ({}) :", self.base.nom()));
        Self::champ_monospace(ui, "resultat_out", &self.resultat, 2);
    }

    fn ui_trace(&mut self, ui: &mut egui::Ui) {
        egui::CollapsingHeader::new("Tracé")
            .default_open(true)
            .show(ui, |ui| {
                let (mut min_x, mut max_x) = self.graphe.domaine();
                let (mut min_y, mut max_y) = self.graphe.plage();
                let mut zoom = self.graphe.zoom();

                egui::Grid::new("reglages_trace")
                    .num_columns(3)
                    .spacing([6.0, 6.0])
                    .show(ui, |ui| {
                        ui.label("x :");
                        let a = ui.add(egui::DragValue::new(&mut min_x).speed(0.1));
                        let b = ui.add(egui::DragValue::new(&mut max_x).speed(0.1));
                        if a.changed() || b.changed() {
                            self.graphe.set_domaine(min_x, max_x);
                        }
                        ui.end_row();

                        ui.label("y :");
                        let a = ui.add(egui::DragValue::new(&mut min_y).speed(0.1));
                        let b = ui.add(egui::DragValue::new(&mut max_y).speed(0.1));
                        if a.changed() || b.changed() {
                            self.graphe.set_plage(min_y, max_y);
                        }
                        ui.end_row();

                        ui.label("zoom :");
                        if ui
                            .add(egui::DragValue::new(&mut zoom).speed(0.05))
                            .changed()
                        {
                            self.graphe.set_zoom(zoom);
                        }
                        ui.end_row();
                    });

                ui.add_space(6.0);

                ui.horizontal(|ui| {
                    if ui.button("Tracer").clicked() {
                        self.lancer_trace();
                    }
                    let annuler = ui.add_enabled(self.trace_en_cours(), egui::Button::new("Annuler"));
                    if annuler.clicked() {
                        self.annuler_trace();
                    }

                    if let Some(tache) = &self.tache {
                        let etat = match tache.etat() {
                            EtatTache::EnAttente => "en attente",
                            EtatTache::EnCours => "en cours…",
                            EtatTache::Annulee => "annulé",
                            EtatTache::Terminee => "terminé",
                            EtatTache::Echec => "échec",
                        };
                        ui.spinner();
                        ui.label(etat);
                    } else if !self.statut.is_empty() {
                        ui.label(&self.statut);
                    }
                });

                if let Some(serie) = &self.serie {
                    let definis = serie.iter().filter(|p| p.est_defini()).count();
                    let apercu = match (serie.points().first(), serie.points().last()) {
                        (Some(a), Some(b)) => {
                            format!("({:.3}, {:.3}) … ({:.3}, {:.3})", a.x, a.y, b.x, b.y)
                        }
                        _ => "série vide".to_string(),
                    };
                    ui.add_space(4.0);
                    Self::champ_monospace(
                        ui,
                        "serie_out",
                        &format!("{} points ({definis} définis)\n{apercu}", serie.len()),
                        2,
                    );
                }
            });
    }

    fn champ_monospace(ui: &mut egui::Ui, id: &str, contenu: &str, rows: usize) {
        egui::Frame::group(ui.style())
            .fill(ui.visuals().extreme_bg_color)
            .show(ui, |ui| {
                ui.push_id(id, |ui| {
                    ui.set_min_width(ui.available_width());
                    ui.set_min_height(
                        rows as f32 * ui.text_style_height(&egui::TextStyle::Monospace),
                    );
                    ui.monospace(contenu);
                });
            });
    }

    fn bouton_action(&mut self, ui: &mut egui::Ui, label: &str, tip: &str, action: Action) {
        let resp = ui
            .add_sized([56.0, 30.0], egui::Button::new(label))
            .on_hover_text(tip);

        if resp.clicked() {
            match action {
                Action::ClearEntree => self.clear_entree(),
                Action::ClearResultats => self.clear_resultats(),
                Action::ResetTotal => self.reset_total(),
                Action::Backspace => self.backspace_entree(),
            }
            self.focus_entree = true;
        }
    }

    fn bouton_insert(&mut self, ui: &mut egui::Ui, label: &str, to_insert: &str, kind: InsertKind) {
        let resp = ui.add_sized([46.0, 28.0], egui::Button::new(label));
        if !resp.clicked() || to_insert.is_empty() {
            return;
        }

        match kind {
            InsertKind::CloseParen => {
                while self.entree.ends_with(' ') {
                    self.entree.pop();
                }
                self.entree.push_str(to_insert);
            }
            InsertKind::Op => {
                while self.entree.ends_with(' ') {
                    self.entree.pop();
                }
                self.entree.push_str(to_insert);
            }
            InsertKind::OpenParen | InsertKind::Func | InsertKind::Digit | InsertKind::Word => {
                // multiplication implicite : "2" puis "sin(" donne "2sin("
                self.entree.push_str(to_insert);
            }
        }

        self.focus_entree = true;
    }

    /* ------------------------ Noyau ------------------------ */

    /// Évalue l’entrée ; un résultat identique à l’entrée (à l’affichage près) n’est pas répété.
    fn evaluer(&mut self) {
        let entree = self.entree.trim().to_string();
        match self.solveur.resoudre(&entree) {
            Ok(resultat) if egal(&resultat, &entree) => self.set_resultat(""),
            Ok(resultat) => self.set_resultat(resultat),
            Err(e) => self.set_erreur(e.to_string()),
        }
    }

    fn lancer_trace(&mut self) {
        self.annuler_trace();
        self.serie = None;
        self.tache = self.graphe.lancer(&self.solveur, self.entree.trim());
        self.statut = if self.tache.is_some() {
            String::new()
        } else {
            "rien à tracer (entrée incomplète, matrices ou domaine vide)".to_string()
        };
        self.focus_entree = true;
    }

    /// Relève l’issue de la tâche si elle est prête. Vrai tant qu’une tâche reste en cours.
    pub fn sonder_trace(&mut self) -> bool {
        let Some(tache) = self.tache.as_mut() else {
            return false;
        };
        let Some(issue) = tache.essayer_issue() else {
            return true;
        };

        self.tache = None;
        match issue {
            Issue::Terminee(serie) => {
                self.statut = format!("tracé terminé : {} points", serie.len());
                self.serie = Some(serie);
            }
            Issue::Annulee => self.statut = "tracé annulé".to_string(),
            Issue::Echec(e) => self.statut = format!("tracé impossible : {e}"),
        }
        false
    }
}

/// Chiffres 0-9 puis A-F (actifs selon la base).
const PAVE: [[char; 4]; 4] = [
    ['7', '8', '9', 'F'],
    ['4', '5', '6', 'E'],
    ['1', '2', '3', 'D'],
    ['0', 'A', 'B', 'C'],
];

#[derive(Clone, Copy, Debug)]
enum Action {
    ClearEntree,
    ClearResultats,
    ResetTotal,
    Backspace,
}

#[derive(Clone, Copy, Debug)]
enum InsertKind {
    Digit,
    Word,
    Func,
    Op,
    OpenParen,
    CloseParen,
}
