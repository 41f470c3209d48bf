//! Noyau: évaluation (pipeline réel)
//!
//! matrices ? -> vide ? -> localiser -> retirer opérateurs finaux -> base -> décimal
//!        -> Symboles (complexe) -> formater re / im -> décimal -> base -> rendu complexe -> relocaliser
//!
//! Remarque : re et im ont chacun leur propre recherche de précision (même budget de ligne).

use log::debug;

use super::base::{changer_base, Base};
use super::erreur::Resultat;
use super::format::{formater, rendre_complexe};
use super::localisation::Localisateur;
use super::matrices::{DetecteurMatrices, ModuleMatrices};
use super::symboles::{Portee, Symboles};

/// Budget de largeur d’une composante affichée.
pub const LONGUEUR_LIGNE_DEFAUT: usize = 8;

pub struct Solveur {
    symboles: Symboles,
    base: Base,
    longueur_ligne: usize,
    localisateur: Option<Localisateur>,
    matrices: Box<dyn ModuleMatrices>,
}

impl Default for Solveur {
    fn default() -> Self {
        Self {
            symboles: Symboles::new(),
            base: Base::Decimal,
            longueur_ligne: LONGUEUR_LIGNE_DEFAUT,
            localisateur: None,
            matrices: Box::new(DetecteurMatrices),
        }
    }
}

impl Solveur {
    pub fn new() -> Self {
        Self::default()
    }

    /// API publique : évalue une expression et retourne le texte affichable.
    /// - "" si l’entrée est vide (pas une erreur)
    /// - opérateurs finaux ignorés (saisie en cours)
    /// - Erreur::Syntaxe si l’expression, la base ou le formatage échoue
    pub fn resoudre(&self, entree: &str) -> Resultat<String> {
        // 1) Matrices : délégation totale
        if self.contient_matrices(entree) {
            return self.matrices.evaluer_matrices(entree);
        }

        // 2) Vide
        if entree.trim().is_empty() {
            return Ok(String::new());
        }

        // 3) Localisation entrante
        let mut texte = match &self.localisateur {
            Some(l) => l.localiser(entree),
            None => entree.to_string(),
        };

        // 4) Opérateurs finaux
        retirer_operateurs_finaux(&mut texte);

        // 5) Base -> décimal
        let decimal = self.convertir_en_decimal(&texte)?;

        // 6) Moteur
        let valeur = self.symboles.eval_complexe(&decimal)?;

        // 7) Formatage indépendant re / im
        let re = formater(valeur.re, self.longueur_ligne)?;
        let im = formater(valeur.im, self.longueur_ligne)?;

        // 8) Décimal -> base d’affichage
        let re = changer_base(&re, Base::Decimal, self.base)?;
        let im = changer_base(&im, Base::Decimal, self.base)?;

        // 9) Rendu
        let resultat = rendre_complexe(valeur, &re, &im);
        debug!("resoudre {entree:?} -> {resultat:?} ({})", self.base.nom());

        // 10) Localisation sortante
        Ok(match &self.localisateur {
            Some(l) => l.relocaliser(&resultat),
            None => resultat,
        })
    }

    /// Évaluation réelle brute (ni formatage ni base).
    pub fn eval_reel(&self, texte: &str) -> Resultat<f64> {
        self.symboles.eval(texte)
    }

    /// Copie indépendante de l’environnement (pour un fil de tracé).
    pub fn contexte(&self) -> Symboles {
        self.symboles.clone()
    }

    /// Cadre de variables sur l’environnement du solveur, dépilé au drop.
    pub fn portee(&mut self) -> Portee<'_> {
        self.symboles.portee()
    }

    pub fn define(&mut self, nom: &str, valeur: f64) {
        self.symboles.define(nom, valeur);
    }

    pub fn convertir_en_decimal(&self, texte: &str) -> Resultat<String> {
        changer_base(texte, self.base, Base::Decimal)
    }

    pub fn contient_matrices(&self, texte: &str) -> bool {
        self.matrices.est_matrice(texte)
    }

    /* ------------------------ Réglages ------------------------ */

    pub fn base(&self) -> Base {
        self.base
    }

    pub fn set_base(&mut self, base: Base) {
        self.base = base;
    }

    pub fn longueur_ligne(&self) -> usize {
        self.longueur_ligne
    }

    pub fn set_longueur_ligne(&mut self, longueur: usize) {
        self.longueur_ligne = longueur;
    }

    pub fn activer_localisation(&mut self, localisateur: Localisateur) {
        self.localisateur = Some(localisateur);
    }

    pub fn desactiver_localisation(&mut self) {
        self.localisateur = None;
    }

    pub fn set_matrices(&mut self, matrices: Box<dyn ModuleMatrices>) {
        self.matrices = matrices;
    }
}

/* ------------------------ Utilitaires texte ------------------------ */

/// Opérateurs infixes (ASCII + glyphes d’affichage).
pub fn est_operateur(c: char) -> bool {
    matches!(c, '+' | '-' | '−' | '*' | '×' | '/' | '÷' | '^')
}

pub fn est_negatif(nombre: &str) -> bool {
    nombre.starts_with(|c: char| c == '-' || c == '−')
}

/// Glyphes d’affichage : - / * -> − ÷ × ; Infinity -> ∞
pub fn nettoyer(texte: &str) -> String {
    texte
        .replace("Infinity", "∞")
        .replace('-', "−")
        .replace('/', "÷")
        .replace('*', "×")
}

/// Égalité “à l’affichage” (après nettoyage).
pub fn egal(a: &str, b: &str) -> bool {
    nettoyer(a) == nettoyer(b)
}

/// Une expression ne peut pas finir par un opérateur : on le traite comme une saisie en cours.
pub fn retirer_operateurs_finaux(texte: &mut String) {
    loop {
        let fin = texte.trim_end().len();
        texte.truncate(fin);
        match texte.chars().last() {
            Some(c) if est_operateur(c) => {
                texte.pop();
            }
            _ => break,
        }
    }
}
