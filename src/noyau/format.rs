// src/noyau/format.rs

use super::erreur::{Erreur, Resultat};
use super::symboles::ValeurNumerique;

/// Plancher de la recherche de précision.
pub const PRECISION_MIN: usize = 7;

/* ------------------------ %g (notation scientifique générale) ------------------------ */

/// Équivalent de "%.{p}g" : décimal si 1e-4 <= |v| < 10^p (après arrondi), sinon mantisse + e±XX.
/// Les zéros de fin sont conservés ici (retouche plus loin).
fn format_general(valeur: f64, precision: usize) -> Resultat<String> {
    if valeur.is_nan() {
        return Err(Erreur::syntaxe("NaN"));
    }
    if valeur.is_infinite() {
        let s = if valeur > 0.0 { "Infinity" } else { "-Infinity" };
        return Ok(s.to_string());
    }

    let p = precision.max(1);
    if valeur == 0.0 {
        return Ok(format!("{:.*}", p - 1, valeur));
    }

    // l’exposant après arrondi décide de la forme
    let sci = format!("{:.*e}", p - 1, valeur);
    let (mantisse, exposant) = sci
        .split_once('e')
        .ok_or_else(|| Erreur::syntaxe(format!("format inattendu: {sci}")))?;
    let exposant: i32 = exposant
        .parse()
        .map_err(|_| Erreur::syntaxe(format!("exposant invalide: {sci}")))?;

    if (-4..p as i32).contains(&exposant) {
        let decimales = (p as i32 - 1 - exposant) as usize;
        return Ok(format!("{valeur:.decimales$}"));
    }

    let signe = if exposant < 0 { '-' } else { '+' };
    Ok(format!("{mantisse}e{signe}{:02}", exposant.abs()))
}

/// Retouche d’une sortie %g :
/// - exposant sans '+' ni zéros de tête ("e+05" -> "e5")
/// - mantisse sans zéros de fin après le séparateur, puis sans séparateur orphelin
fn retoucher(brut: &str) -> Resultat<String> {
    let (mantisse, exposant) = match brut.split_once('e') {
        Some((m, e)) => {
            let e = e.strip_prefix('+').unwrap_or(e);
            let n: i32 = e
                .parse()
                .map_err(|_| Erreur::syntaxe(format!("exposant invalide: {brut}")))?;
            (m, Some(n.to_string()))
        }
        None => (brut, None),
    };

    let mut mantisse = mantisse.to_string();
    if mantisse.contains(|c: char| c == '.' || c == ',') {
        while mantisse.ends_with('0') {
            mantisse.pop();
        }
        if mantisse.ends_with(|c: char| c == '.' || c == ',') {
            mantisse.pop();
        }
    }

    Ok(match exposant {
        Some(e) => format!("{mantisse}e{e}"),
        None => mantisse,
    })
}

/* ------------------------ Formatage adaptatif ------------------------ */

pub fn formater_avec_precision(valeur: f64, precision: usize) -> Resultat<String> {
    retoucher(&format_general(valeur, precision)?)
}

/// Plus courte écriture qui tient dans `longueur_ligne` caractères :
/// précision décroissante de `longueur_ligne` jusqu’à PRECISION_MIN.
/// Si rien ne tient, la sortie à PRECISION_MIN est rendue telle quelle (meilleur effort).
pub fn formater(valeur: f64, longueur_ligne: usize) -> Resultat<String> {
    let plafond = longueur_ligne.max(PRECISION_MIN);
    let mut texte = String::new();
    for precision in (PRECISION_MIN..=plafond).rev() {
        texte = formater_avec_precision(valeur, precision)?;
        if texte.chars().count() <= longueur_ligne {
            break;
        }
    }
    Ok(texte)
}

/* ------------------------ Rendu complexe ------------------------ */

/// Assemble re/im déjà formatés. Le cas est choisi sur la VALEUR numérique
/// (une partie minuscule peut s’afficher "0" sans être nulle).
///
/// re≠0 : re+i, re+{im}i, re-i, re{im}i (signe porté par im), re
/// re=0 : i, -i, {im}i, 0
pub fn rendre_complexe(valeur: ValeurNumerique, re: &str, im: &str) -> String {
    let (a, b) = (valeur.re, valeur.im);

    if a != 0.0 {
        if b == 1.0 {
            format!("{re}+i")
        } else if b > 0.0 {
            format!("{re}+{im}i")
        } else if b == -1.0 {
            format!("{re}-i")
        } else if b < 0.0 {
            format!("{re}{im}i")
        } else {
            re.to_string()
        }
    } else if b == 1.0 {
        "i".to_string()
    } else if b == -1.0 {
        "-i".to_string()
    } else if b != 0.0 {
        format!("{im}i")
    } else {
        "0".to_string()
    }
}
