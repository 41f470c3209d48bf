// src/noyau/erreur.rs
//
// Deux sortes d’échec seulement :
// - Syntaxe : expression, conversion de base ou formatage impossible (échec pour CETTE évaluation)
// - Annulee : balayage interrompu sur demande (pas une faute)

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Erreur {
    #[error("erreur de syntaxe : {0}")]
    Syntaxe(String),
    #[error("calcul annulé")]
    Annulee,
}

impl Erreur {
    pub fn syntaxe(msg: impl Into<String>) -> Self {
        Erreur::Syntaxe(msg.into())
    }
}

pub type Resultat<T> = Result<T, Erreur>;
