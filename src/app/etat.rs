//! src/app/etat.rs
//!
//! État UI (sans vue).
//!
//! Rôle : contenir l’état de la calculatrice (entrée, résultat, erreur, réglages, tracé)
//! et offrir des opérations simples (C/CLR/AC, réglages bornés) sans logique d’affichage.
//!
//! Contrats :
//! - Aucune évaluation ici : le solveur et le module de tracé sont seulement détenus et réglés.
//! - Actions déterministes, sans effet de bord caché.
//! - Bornes sur les réglages (longueur de ligne, zoom).

use crate::noyau::eval::LONGUEUR_LIGNE_DEFAUT;
use crate::noyau::localisation::Localisateur;
use crate::noyau::{Base, ModuleGraphe, Serie, Solveur, TacheGraphe};

/// Garde-fou : largeur d’affichage d’une composante.
pub const LONGUEUR_LIGNE_MIN: usize = 1;
pub const LONGUEUR_LIGNE_MAX: usize = 40;

pub struct AppCalc {
    // --- entrée utilisateur ---
    pub entree: String,

    // --- sorties ---
    pub resultat: String, // texte du solveur (vide si identique à l’entrée)
    pub erreur: String,   // message d’erreur (si l’évaluation échoue)

    // --- paramètres ---
    pub base: Base,
    pub longueur_ligne: usize,
    pub chiffres_arabes: bool,

    // --- noyau ---
    pub solveur: Solveur,
    pub graphe: ModuleGraphe,

    // --- tracé ---
    pub tache: Option<TacheGraphe>,
    pub serie: Option<Serie>,
    pub statut: String,

    // --- UX ---
    pub focus_entree: bool,
}

impl Default for AppCalc {
    fn default() -> Self {
        Self {
            entree: String::new(),
            resultat: String::new(),
            erreur: String::new(),
            base: Base::Decimal,
            longueur_ligne: LONGUEUR_LIGNE_DEFAUT,
            chiffres_arabes: false,
            solveur: Solveur::new(),
            graphe: ModuleGraphe::new(),
            tache: None,
            serie: None,
            statut: String::new(),
            focus_entree: true, // au lancement, on veut pouvoir taper tout de suite
        }
    }
}

impl AppCalc {
    /* ------------------------ Actions “boutons” (état seulement) ------------------------ */

    /// AC : remise à zéro totale (entrée + résultats + réglages par défaut + tracé).
    pub fn reset_total(&mut self) {
        self.entree.clear();
        self.clear_resultats();
        self.set_base(Base::Decimal);
        self.set_longueur_ligne(LONGUEUR_LIGNE_DEFAUT);
        self.set_chiffres_arabes(false);
        self.graphe = ModuleGraphe::new();
        self.annuler_trace();
        self.serie = None;
        self.statut.clear();
    }

    /// C : effacer seulement l’entrée (sans toucher aux résultats).
    pub fn clear_entree(&mut self) {
        self.entree.clear();
        self.focus_entree = true;
    }

    /// CLR : effacer résultat + erreur (sans toucher à l’entrée).
    pub fn clear_resultats(&mut self) {
        self.resultat.clear();
        self.erreur.clear();
        self.focus_entree = true;
    }

    /// On CONSERVE le dernier résultat pour ne pas “effacer l’écran” sur une faute.
    pub fn set_erreur(&mut self, msg: impl Into<String>) {
        self.erreur = msg.into();
        self.focus_entree = true;
    }

    pub fn set_resultat(&mut self, resultat: impl Into<String>) {
        self.erreur.clear();
        self.resultat = resultat.into();
        self.focus_entree = true;
    }

    /* ------------------------ Réglages ------------------------ */

    pub fn set_base(&mut self, base: Base) {
        self.base = base;
        self.solveur.set_base(base);
    }

    pub fn set_longueur_ligne(&mut self, longueur: usize) {
        self.longueur_ligne = longueur.clamp(LONGUEUR_LIGNE_MIN, LONGUEUR_LIGNE_MAX);
        self.solveur.set_longueur_ligne(self.longueur_ligne);
    }

    /// Saisie et affichage en chiffres arabes orientaux (٠١٢…).
    pub fn set_chiffres_arabes(&mut self, actif: bool) {
        self.chiffres_arabes = actif;
        if actif {
            self.solveur
                .activer_localisation(Localisateur::chiffres_arabes_orientaux());
        } else {
            self.solveur.desactiver_localisation();
        }
    }

    /* ------------------------ Tracé ------------------------ */

    /// Annule et oublie la tâche en cours (la série affichée reste).
    pub fn annuler_trace(&mut self) {
        if let Some(tache) = self.tache.take() {
            tache.annuler();
            self.statut = "tracé annulé".to_string();
        }
    }

    pub fn trace_en_cours(&self) -> bool {
        self.tache.is_some()
    }
}
