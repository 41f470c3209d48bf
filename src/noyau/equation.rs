// src/noyau/equation.rs
//
// Forme d’une équation de tracé, décidée une seule fois avant le balayage.
//
// Priorité (première règle gagnante) :
//   1) y = f   (f sans y) -> ExpliciteYdeX(f)
//   2) x = f   (f sans x) -> ExpliciteXdeY(f)
//   3) f = y   (f sans y) -> ExpliciteYdeX(f)
//   4) f = x   (f sans x) -> ExpliciteXdeY(f)
//   5) sinon               -> Implicite(gauche, droite)
// Sans "=" : toujours ExpliciteYdeX(texte).

use super::erreur::Resultat;
use super::expr::Expr;
use super::jetons::reference_variable;
use super::symboles::Symboles;

#[derive(Clone, Debug, PartialEq)]
pub enum Forme<T> {
    ExpliciteYdeX(T),
    ExpliciteXdeY(T),
    Implicite(T, T),
}

impl<T> Forme<T> {
    /// Transforme chaque côté ; la première erreur interrompt.
    pub fn try_map<U, F>(self, mut f: F) -> Resultat<Forme<U>>
    where
        F: FnMut(T) -> Resultat<U>,
    {
        Ok(match self {
            Forme::ExpliciteYdeX(e) => Forme::ExpliciteYdeX(f(e)?),
            Forme::ExpliciteXdeY(e) => Forme::ExpliciteXdeY(f(e)?),
            Forme::Implicite(g, d) => Forme::Implicite(f(g)?, f(d)?),
        })
    }

    pub fn est_implicite(&self) -> bool {
        matches!(self, Forme::Implicite(..))
    }
}

impl Forme<String> {
    pub fn compiler(self) -> Resultat<Forme<Expr>> {
        self.try_map(|texte| Symboles::compiler(&texte))
    }
}

/// Découpe sur "=" : parties vides de fin ignorées.
/// Deux parties ou plus -> (gauche, Some(droite)) sur les deux premières ;
/// sinon le texte entier est un seul côté.
pub fn separer_equation(texte: &str) -> (&str, Option<&str>) {
    let mut parties: Vec<&str> = texte.split('=').collect();
    while parties.last().is_some_and(|p| p.is_empty()) {
        parties.pop();
    }
    if parties.len() >= 2 {
        (parties[0], Some(parties[1]))
    } else {
        (texte, None)
    }
}

fn est_variable(cote: &str, nom: &str) -> bool {
    cote.trim().eq_ignore_ascii_case(nom)
}

pub fn classer(gauche: &str, droite: &str) -> Forme<String> {
    let g = gauche.trim().to_string();
    let d = droite.trim().to_string();

    if est_variable(&g, "y") && !reference_variable(&d, "y") {
        Forme::ExpliciteYdeX(d)
    } else if est_variable(&g, "x") && !reference_variable(&d, "x") {
        Forme::ExpliciteXdeY(d)
    } else if est_variable(&d, "y") && !reference_variable(&g, "y") {
        Forme::ExpliciteYdeX(g)
    } else if est_variable(&d, "x") && !reference_variable(&g, "x") {
        Forme::ExpliciteXdeY(g)
    } else {
        Forme::Implicite(g, d)
    }
}

/// Découpe puis classe ; `convertir` est appliqué à chaque côté avant la classification
/// (typiquement : base d’affichage -> décimal).
pub fn classer_texte<F>(texte: &str, mut convertir: F) -> Resultat<Forme<String>>
where
    F: FnMut(&str) -> Resultat<String>,
{
    Ok(match separer_equation(texte) {
        (gauche, Some(droite)) => classer(&convertir(gauche)?, &convertir(droite)?),
        (seul, None) => Forme::ExpliciteYdeX(convertir(seul)?.trim().to_string()),
    })
}
