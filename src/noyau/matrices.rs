// src/noyau/matrices.rs
//
// Frontière avec le module matrices : le solveur détecte, puis délègue entièrement.
// L’arithmétique matricielle vit ailleurs ; DetecteurMatrices se contente de reconnaître
// la syntaxe ([…]) et de refuser proprement l’évaluation.

use super::erreur::{Erreur, Resultat};

pub trait ModuleMatrices: Send + Sync {
    fn est_matrice(&self, texte: &str) -> bool;
    fn evaluer_matrices(&self, texte: &str) -> Resultat<String>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct DetecteurMatrices;

impl ModuleMatrices for DetecteurMatrices {
    fn est_matrice(&self, texte: &str) -> bool {
        texte.contains('[')
    }

    fn evaluer_matrices(&self, _texte: &str) -> Resultat<String> {
        Err(Erreur::syntaxe("matrices non prises en charge"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detection_par_crochet() {
        let m = DetecteurMatrices;
        assert!(m.est_matrice("[[1,2],[3,4]]*2"));
        assert!(!m.est_matrice("(1+2)*3"));
        assert!(m.evaluer_matrices("[[1]]").is_err());
    }
}
