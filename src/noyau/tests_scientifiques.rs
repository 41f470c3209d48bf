//! Tests scientifiques (campagne) : invariants + limites contrôlées.
//!
//! But : vérifier les propriétés du formatage, du rendu complexe et du tracé
//! sur des balayages de valeurs, sans faire chauffer la machine.
//! - budget temps global par test
//! - tailles bornées (nombre de valeurs, raster)
//!
//! Notes :
//! - Le formatage ne garantit la longueur que si une précision entre 7 et le budget y parvient
//!   (sinon meilleur effort à 7) : on teste donc la relecture, pas la longueur brute.
//! - Les balayages sont calculés par indice : le nombre de points est exact.

use std::time::{Duration, Instant};

use num_complex::Complex64;

use super::base::Base;
use super::equation::{classer, Forme};
use super::erreur::Erreur;
use super::eval::Solveur;
use super::format::{formater, formater_avec_precision, rendre_complexe, PRECISION_MIN};
use super::graphe::{echantillonner, Issue, JetonAnnulation, ModuleGraphe, RequeteGraphe};
use super::symboles::Symboles;

/// Budget global anti-gel.
fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/// Valeurs “scientifiques” : mantisses variées sur 24 décades, des deux signes.
fn valeurs() -> Vec<f64> {
    let mantisses = [1.0, 1.5, 2.0, 3.14159265, 9.99999999, 1.0 / 3.0, 6.02214076, 7.0 / 9.0];
    let mut out = Vec::new();
    for e in -12..=12 {
        for m in mantisses {
            let v = m * 10f64.powi(e);
            out.push(v);
            out.push(-v);
        }
    }
    out.push(0.0);
    out
}

fn mantisse_et_exposant(s: &str) -> (&str, Option<&str>) {
    match s.split_once('e') {
        Some((m, e)) => (m, Some(e)),
        None => (s, None),
    }
}

/* ------------------------ Formatage ------------------------ */

#[test]
fn sci_format_relecture_dans_la_precision() {
    let t0 = Instant::now();
    let max = Duration::from_secs(2);

    for longueur in [7usize, 8, 10, 12, 16] {
        for v in valeurs() {
            budget(t0, max);
            let s = formater(v, longueur).unwrap_or_else(|e| panic!("v={v} err={e}"));
            let relu: f64 = s
                .parse()
                .unwrap_or_else(|_| panic!("relecture impossible: v={v} s={s:?}"));

            // au pire précision 7 : demi-unité sur le 7e chiffre significatif
            let tolerance = v.abs() * 5e-7 * 1.000001;
            assert!(
                (relu - v).abs() <= tolerance,
                "v={v} longueur={longueur} s={s:?} relu={relu}"
            );
        }
    }
}

#[test]
fn sci_format_forme_canonique() {
    for longueur in [7usize, 8, 12] {
        for v in valeurs() {
            let s = formater(v, longueur).unwrap_or_else(|e| panic!("v={v} err={e}"));
            let (m, e) = mantisse_et_exposant(&s);

            assert!(!m.ends_with('.'), "séparateur orphelin: {s:?}");
            if m.contains('.') {
                assert!(!m.ends_with('0'), "zéro de fin: {s:?}");
            }
            if let Some(e) = e {
                assert!(!e.starts_with('+'), "exposant avec '+': {s:?}");
                let chiffres = e.strip_prefix('-').unwrap_or(e);
                assert!(!chiffres.starts_with('0'), "exposant avec zéro de tête: {s:?}");
                assert!(chiffres.chars().all(|c| c.is_ascii_digit()), "exposant: {s:?}");
            }
        }
    }
}

#[test]
fn sci_format_longueur_quand_atteignable() {
    // si la précision plancher tient dans le budget, la sortie aussi
    for longueur in [8usize, 10, 14] {
        for v in valeurs() {
            let plancher = formater_avec_precision(v, PRECISION_MIN).unwrap();
            let s = formater(v, longueur).unwrap();
            if plancher.chars().count() <= longueur {
                assert!(s.chars().count() <= longueur, "v={v} s={s:?}");
            } else {
                // une précision plus haute peut tenir en décimal (31415927) ; sinon plancher
                assert!(
                    s.chars().count() <= longueur || s == plancher,
                    "v={v} s={s:?} plancher={plancher:?}"
                );
            }
        }
    }
}

/* ------------------------ Rendu complexe ------------------------ */

#[test]
fn sci_rendu_table_complete() {
    let cas = [
        ((3.0, 0.0), "3"),
        ((0.0, 0.0), "0"),
        ((0.0, 1.0), "i"),
        ((0.0, -1.0), "-i"),
        ((2.0, 3.0), "2+3i"),
        ((2.0, -3.0), "2-3i"),
        ((0.0, 5.0), "5i"),
        ((-2.0, 1.0), "-2+i"),
        ((-2.0, -1.0), "-2-i"),
    ];
    for ((re, im), attendu) in cas {
        let z = Complex64::new(re, im);
        let sre = formater(re, 8).unwrap();
        let sim = formater(im, 8).unwrap();
        assert_eq!(rendre_complexe(z, &sre, &sim), attendu, "z={z}");
    }
}

#[test]
fn sci_solveur_de_bout_en_bout() {
    let s = Solveur::new();
    assert_eq!(s.resoudre("").unwrap(), "");
    assert_eq!(s.resoudre("2+").unwrap(), "2");
    assert_eq!(s.resoudre("(1+2i)*(1-2i)").unwrap(), "5");
    assert_eq!(s.resoudre("i^2").unwrap(), "-1");
    assert_eq!(s.resoudre("2^0.5*2^0.5").unwrap(), "2");
    assert!(matches!(s.resoudre("2*/3"), Err(Erreur::Syntaxe(_))));
}

/* ------------------------ Classement ------------------------ */

#[test]
fn sci_classement_exemples() {
    assert!(matches!(classer("y", "x^2"), Forme::ExpliciteYdeX(_)));
    assert!(matches!(classer("x^2+y^2", "4"), Forme::Implicite(_, _)));
    assert!(matches!(classer("x", "cos(y)"), Forme::ExpliciteXdeY(_)));
}

/* ------------------------ Tracé ------------------------ */

fn requete(equation: &str, min: f32, max: f32) -> RequeteGraphe {
    RequeteGraphe {
        min_x: min,
        max_x: max,
        min_y: min,
        max_y: max,
        zoom: 1.0,
        equation: equation.to_string(),
        base: Base::Decimal,
    }
}

#[test]
fn sci_trace_nombre_de_points_exact() {
    let t0 = Instant::now();
    let max = Duration::from_secs(2);

    // (borne, points attendus à pas 0.1)
    for (borne, n) in [(1.0f32, 21usize), (2.5, 51), (10.0, 201)] {
        budget(t0, max);
        let mut s = Symboles::new();
        let serie = echantillonner(&requete("y=x", -borne, borne), &mut s, &JetonAnnulation::new())
            .unwrap();
        assert_eq!(serie.len(), n, "borne={borne}");
        assert_eq!(s.profondeur(), 1);
    }
}

#[test]
fn sci_trace_implicite_borne() {
    let t0 = Instant::now();
    let max = Duration::from_secs(5);

    let mut s = Symboles::new();
    let serie = echantillonner(
        &requete("x^2+y^2=25", -6.0, 6.0),
        &mut s,
        &JetonAnnulation::new(),
    )
    .unwrap();
    budget(t0, max);

    // raster en ordre : x croissant, puis y décroissant à x fixé
    for w in serie.points().windows(2) {
        assert!(w[0].x < w[1].x || (w[0].x == w[1].x && w[0].y > w[1].y));
    }
    // les quatre points cardinaux du cercle sont sur la grille
    for (cx, cy) in [(5.0f32, 0.0f32), (-5.0, 0.0), (0.0, 5.0), (0.0, -5.0)] {
        assert!(
            serie
                .iter()
                .any(|p| (p.x - cx).abs() < 1e-4 && (p.y - cy).abs() < 1e-4),
            "point ({cx}, {cy}) absent"
        );
    }
}

#[test]
fn sci_trace_domaine_degenere_sans_tache() {
    let solveur = Solveur::new();
    let mut module = ModuleGraphe::new();
    module.set_domaine(3.0, 3.0);
    assert!(module.lancer(&solveur, "y=x").is_none());
}

#[test]
fn sci_trace_annule_jamais_partiel() {
    let solveur = Solveur::new();
    let mut module = ModuleGraphe::new();
    module.set_zoom(0.001);

    for _ in 0..3 {
        let tache = module.lancer(&solveur, "sin(x)=cos(y)").expect("tâche");
        tache.annuler();
        assert_eq!(tache.attendre(), Issue::Annulee);
    }
}
