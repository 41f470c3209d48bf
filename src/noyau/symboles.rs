// src/noyau/symboles.rs
//
// Moteur symbolique : texte -> jetons -> RPN -> Expr -> valeur complexe,
// avec une pile de cadres de variables.
//
// Contrat des cadres :
// - le cadre de base n’est jamais retiré ;
// - define écrit dans le cadre du sommet ;
// - une Portee empile à la création et dépile au drop (retour anticipé, annulation, panique).

use std::collections::HashMap;
use std::ops::{Deref, DerefMut};

use log::{debug, warn};
use num_complex::Complex64;

use super::erreur::{Erreur, Resultat};
use super::expr::Expr;
use super::jetons::{format_tokens, tokenize};
use super::rpn::{from_rpn, to_rpn};

/// Résultat d’une évaluation : (re, im), im == 0 pour un réel.
pub type ValeurNumerique = Complex64;

#[derive(Clone, Debug)]
pub struct Symboles {
    cadres: Vec<HashMap<String, f64>>,
}

impl Default for Symboles {
    fn default() -> Self {
        Self {
            cadres: vec![HashMap::new()],
        }
    }
}

impl Symboles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile une expression une fois pour toutes (réutilisable à chaque échantillon).
    pub fn compiler(texte: &str) -> Resultat<Expr> {
        let jetons = tokenize(texte)?;
        let rpn = to_rpn(&jetons)?;
        debug!("compilation {texte:?} -> rpn [{}]", format_tokens(&rpn));
        from_rpn(&rpn)
    }

    /* ------------------------ Cadres ------------------------ */

    pub fn push_cadre(&mut self) {
        self.cadres.push(HashMap::new());
    }

    pub fn pop_cadre(&mut self) {
        if self.cadres.len() > 1 {
            self.cadres.pop();
        } else {
            warn!("pop_cadre sur le cadre de base ignoré");
        }
    }

    /// Nombre de cadres (base comprise).
    pub fn profondeur(&self) -> usize {
        self.cadres.len()
    }

    /// Lie `nom` (casse ignorée) dans le cadre du sommet.
    pub fn define(&mut self, nom: &str, valeur: f64) {
        if let Some(cadre) = self.cadres.last_mut() {
            cadre.insert(nom.to_lowercase(), valeur);
        }
    }

    /// Valeur visible de `nom` : le cadre le plus récent l’emporte.
    pub fn valeur(&self, nom: &str) -> Option<f64> {
        self.cadres.iter().rev().find_map(|c| c.get(nom).copied())
    }

    /// Empile un cadre et rend un garde qui le dépile au drop.
    pub fn portee(&mut self) -> Portee<'_> {
        self.push_cadre();
        Portee { symboles: self }
    }

    /* ------------------------ Évaluation ------------------------ */

    pub fn evaluer(&self, expr: &Expr) -> Resultat<ValeurNumerique> {
        expr.evaluer(&|nom: &str| self.valeur(nom))
    }

    /// Évaluation réelle : échoue si la partie imaginaire n’est pas nulle.
    pub fn evaluer_reel(&self, expr: &Expr) -> Resultat<f64> {
        let z = self.evaluer(expr)?;
        if z.im != 0.0 {
            return Err(Erreur::syntaxe("résultat complexe"));
        }
        Ok(z.re)
    }

    pub fn eval_complexe(&self, texte: &str) -> Resultat<ValeurNumerique> {
        self.evaluer(&Self::compiler(texte)?)
    }

    pub fn eval(&self, texte: &str) -> Resultat<f64> {
        self.evaluer_reel(&Self::compiler(texte)?)
    }
}

/// Garde de cadre : Deref vers Symboles pour define / eval dans la portée.
pub struct Portee<'a> {
    symboles: &'a mut Symboles,
}

impl Deref for Portee<'_> {
    type Target = Symboles;

    fn deref(&self) -> &Symboles {
        self.symboles
    }
}

impl DerefMut for Portee<'_> {
    fn deref_mut(&mut self) -> &mut Symboles {
        self.symboles
    }
}

impl Drop for Portee<'_> {
    fn drop(&mut self) {
        self.symboles.pop_cadre();
    }
}
