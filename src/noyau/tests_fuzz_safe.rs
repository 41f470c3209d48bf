//! Tests fuzz safe : robustesse + déterminisme + limites contrôlées.
//!
//! But : marteler le solveur sans brûler la machine.
//! - RNG déterministe (seed fixe)
//! - profondeur bornée
//! - budget temps global
//! - seules les erreurs de syntaxe sont acceptées (jamais de panique, jamais Annulee)
//! - invariant clé : un résultat affiché se relit et redonne la même valeur

use std::time::{Duration, Instant};

use super::base::Base;
use super::erreur::Erreur;
use super::eval::Solveur;
use super::graphe::{echantillonner, JetonAnnulation, RequeteGraphe};
use super::symboles::Symboles;

/* ------------------------ RNG déterministe minimal ------------------------ */

#[derive(Clone)]
struct Rng {
    state: u64,
}
impl Rng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }
    fn next_u32(&mut self) -> u32 {
        // LCG simple (déterministe)
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }
    fn pick(&mut self, n: u32) -> u32 {
        if n == 0 {
            0
        } else {
            self.next_u32() % n
        }
    }
    fn coin(&mut self) -> bool {
        (self.next_u32() & 1) == 1
    }
}

/* ------------------------ Budget anti-gel ------------------------ */

fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Génération d’expressions (bornée) ------------------------ */

fn gen_nombre(rng: &mut Rng) -> String {
    match rng.pick(6) {
        0 => "0".to_string(),
        1 => format!("{}", rng.pick(10)),
        2 => format!("{}.{}", rng.pick(100), rng.pick(100)),
        3 => format!("{}e{}", 1 + rng.pick(9), rng.pick(7)),
        4 => format!("{}e-{}", 1 + rng.pick(9), rng.pick(7)),
        _ => format!("{}", rng.pick(1000)),
    }
}

fn gen_atom(rng: &mut Rng) -> String {
    match rng.pick(7) {
        0 | 1 | 2 => gen_nombre(rng),
        3 => "pi".to_string(),
        4 => "e".to_string(),
        5 => "i".to_string(),
        _ => "π".to_string(),
    }
}

fn gen_fonction(rng: &mut Rng) -> &'static str {
    const FONCTIONS: [&str; 10] = [
        "sin", "cos", "tan", "sqrt", "ln", "log", "exp", "abs", "atan", "√",
    ];
    FONCTIONS[rng.pick(FONCTIONS.len() as u32) as usize]
}

fn gen_expr(rng: &mut Rng, depth: usize) -> String {
    if depth == 0 {
        return gen_atom(rng);
    }

    match rng.pick(9) {
        0 => gen_atom(rng),
        1 => format!("({}+{})", gen_expr(rng, depth - 1), gen_expr(rng, depth - 1)),
        2 => format!("({}−{})", gen_expr(rng, depth - 1), gen_expr(rng, depth - 1)),
        3 => format!("({}×{})", gen_expr(rng, depth - 1), gen_expr(rng, depth - 1)),
        4 => format!("({}/{})", gen_expr(rng, depth - 1), gen_expr(rng, depth - 1)),
        5 => format!("({})^{}", gen_expr(rng, depth - 1), rng.pick(4)),
        6 => format!("-{}", gen_expr(rng, depth - 1)),
        7 => format!("{}({})", gen_fonction(rng), gen_expr(rng, depth - 1)),
        _ => format!("{}{}", gen_nombre(rng), gen_atom(rng)), // produit implicite
    }
}

/// Bruit de saisie : opérateur final, parenthèse en trop, caractère parasite.
fn abimer(rng: &mut Rng, expr: String) -> String {
    match rng.pick(8) {
        0 => format!("{expr}+"),
        1 => format!("{expr}×÷"),
        2 => format!("({expr}"),
        3 => format!("{expr})"),
        4 => format!("{expr}#"),
        _ => expr,
    }
}

/* ------------------------ Helper somme balancée anti pile ------------------------ */

fn somme_balancee(terme: &str, n: usize) -> String {
    let mut items: Vec<String> = (0..n).map(|_| terme.to_string()).collect();
    while items.len() > 1 {
        let mut next = Vec::new();
        let mut i = 0;
        while i < items.len() {
            if i + 1 < items.len() {
                next.push(format!("({}+{})", items[i], items[i + 1]));
                i += 2;
            } else {
                next.push(items[i].clone());
                i += 1;
            }
        }
        items = next;
    }
    items.pop().unwrap_or_else(|| "0".to_string())
}

fn assert_proches(a: f64, b: f64, ctx: &str) {
    let tol = 1e-5 * a.abs().max(b.abs()).max(1e-300);
    assert!((a - b).abs() <= tol, "{ctx}: {a} != {b}");
}

/* ------------------------ Tests ------------------------ */

#[test]
fn fuzz_safe_determinisme_et_relecture() {
    let t0 = Instant::now();
    let max = Duration::from_secs(3);

    let mut rng = Rng::new(0xC0FFEE_u64);
    let a = Solveur::new();
    let b = Solveur::new();
    let contexte = a.contexte();

    let mut seen_ok = 0usize;
    let mut seen_err = 0usize;

    for _ in 0..300 {
        budget(t0, max);

        let expr = gen_expr(&mut rng, 4);
        let expr = if rng.coin() { abimer(&mut rng, expr) } else { expr };

        let ra = a.resoudre(&expr);
        // même entrée => même sortie
        assert_eq!(ra, b.resoudre(&expr), "non déterministe: expr={expr:?}");

        match ra {
            Ok(texte) => {
                seen_ok += 1;
                // relecture : la valeur affichée redonne la valeur calculée (à la précision affichée)
                let calcule = contexte
                    .eval_complexe(expr.trim_end_matches(|c: char| "+×÷".contains(c)))
                    .unwrap_or_else(|e| panic!("expr={expr:?} err={e}"));
                let relu = contexte
                    .eval_complexe(&texte)
                    .unwrap_or_else(|e| panic!("relecture {texte:?} (expr={expr:?}) err={e}"));
                assert_proches(calcule.re, relu.re, &format!("re de {expr:?} -> {texte:?}"));
                assert_proches(calcule.im, relu.im, &format!("im de {expr:?} -> {texte:?}"));
            }
            Err(Erreur::Syntaxe(_)) => seen_err += 1,
            Err(e) => panic!("erreur non attendue: expr={expr:?} err={e}"),
        }
    }

    // On veut voir un mix des deux, sinon le fuzz ne “balaye” rien.
    assert!(seen_ok > 30, "trop peu de succès: {seen_ok}");
    assert!(seen_err > 0, "aucune erreur vue: fuzz trop “sage”");
}

#[test]
fn fuzz_safe_longueurs_de_ligne() {
    let t0 = Instant::now();
    let max = Duration::from_secs(2);

    let mut rng = Rng::new(0xBADC0DE_u64);
    let mut s = Solveur::new();

    for _ in 0..150 {
        budget(t0, max);
        s.set_longueur_ligne(1 + rng.pick(30) as usize);
        let expr = gen_expr(&mut rng, 3);
        // ne doit jamais paniquer, quel que soit le budget
        if let Err(e) = s.resoudre(&expr) {
            assert!(matches!(e, Erreur::Syntaxe(_)), "expr={expr:?} err={e}");
        }
    }
}

#[test]
fn fuzz_safe_bases() {
    let t0 = Instant::now();
    let max = Duration::from_secs(2);

    let mut rng = Rng::new(0x5EED_u64);
    let mut s = Solveur::new();

    for _ in 0..150 {
        budget(t0, max);
        let base = match rng.pick(3) {
            0 => Base::Decimal,
            1 => Base::Hexadecimal,
            _ => Base::Binaire,
        };
        s.set_base(base);

        let a = rng.pick(256);
        let b = 1 + rng.pick(255);
        let (a_txt, b_txt) = match base {
            Base::Decimal => (format!("{a}"), format!("{b}")),
            Base::Hexadecimal => (format!("{a:X}"), format!("{b:X}")),
            Base::Binaire => (format!("{a:b}"), format!("{b:b}")),
        };

        // somme entière : exacte dans toutes les bases
        let somme = s
            .resoudre(&format!("{a_txt}+{b_txt}"))
            .unwrap_or_else(|e| panic!("{a_txt}+{b_txt} en {} err={e}", base.nom()));
        let attendu = match base {
            Base::Decimal => format!("{}", a + b),
            Base::Hexadecimal => format!("{:X}", a + b),
            Base::Binaire => format!("{:b}", a + b),
        };
        assert_eq!(somme, attendu, "{a_txt}+{b_txt} en {}", base.nom());

        // quotient : ne panique pas, peut être tronqué
        let _ = s.resoudre(&format!("{a_txt}/{b_txt}"));
    }
}

#[test]
fn fuzz_safe_somme_balancee_anti_pile() {
    let t0 = Instant::now();
    let max = Duration::from_millis(500);

    let expr = somme_balancee("1/2", 800);
    budget(t0, max);

    let s = Solveur::new();
    let r = s.resoudre(&expr).unwrap_or_else(|e| panic!("err: {e}"));

    // 800*(1/2) = 400
    assert_eq!(r, "400");
}

#[test]
fn fuzz_safe_trace_sans_panique() {
    let t0 = Instant::now();
    let max = Duration::from_secs(3);

    let mut rng = Rng::new(0xFACADE_u64);

    for _ in 0..40 {
        budget(t0, max);

        let gauche = if rng.coin() { "y".to_string() } else { gen_expr(&mut rng, 2) };
        let droite = format!("{}*x", gen_expr(&mut rng, 2));
        let requete = RequeteGraphe {
            min_x: -2.0,
            max_x: 2.0,
            min_y: -2.0,
            max_y: 2.0,
            zoom: 1.0,
            equation: format!("{gauche}={droite}"),
            base: Base::Decimal,
        };

        let mut s = Symboles::new();
        match echantillonner(&requete, &mut s, &JetonAnnulation::new()) {
            Ok(serie) => assert!(serie.len() <= 41 * 41),
            Err(e) => assert!(matches!(e, Erreur::Syntaxe(_)), "err={e}"),
        }
        // le cadre du balayage est toujours rendu
        assert_eq!(s.profondeur(), 1);
    }
}
