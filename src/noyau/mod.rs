//! Noyau numérique : solveur (formule) + tracé (points)
//!
//! Organisation interne :
//! - erreur.rs       : deux genres d’erreur (syntaxe, annulation)
//! - jetons.rs       : tokenisation (+ produits implicites)
//! - rpn.rs          : shunting-yard + construction Expr
//! - expr.rs         : AST + évaluation complexe (chemin réel exact)
//! - symboles.rs     : moteur + pile de cadres de variables (Portee)
//! - base.rs         : bases d’affichage + conversion des numéraux
//! - matrices.rs     : frontière avec le module matrices
//! - localisation.rs : substitution de glyphes
//! - format.rs       : précision adaptative + rendu complexe
//! - eval.rs         : pipeline du solveur
//! - equation.rs     : forme d’une équation (explicite / implicite)
//! - graphe.rs       : balayage annulable sur un fil dédié

pub mod base;
pub mod equation;
pub mod erreur;
pub mod eval;
pub mod expr;
pub mod format;
pub mod graphe;
pub mod jetons;
pub mod localisation;
pub mod matrices;
pub mod rpn;
pub mod symboles;

#[cfg(test)]
mod tests_scientifiques;

#[cfg(test)]
mod tests_fuzz_safe;

// API publique minimale
pub use base::Base;
pub use erreur::{Erreur, Resultat};
pub use eval::{egal, Solveur};
pub use graphe::{EtatTache, Issue, ModuleGraphe, Serie, TacheGraphe};
