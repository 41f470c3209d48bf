// src/noyau/jetons.rs

use super::erreur::{Erreur, Resultat};
use super::expr::Fonction;

#[derive(Clone, Debug, PartialEq)]
pub enum Tok {
    Num(f64),
    Pi,

    // Fonctions + variables + constantes nommées (e, i)
    // NOTE: le parse (RPN->Expr) décidera si c’est une fonction (sin/cos/...) ou une variable.
    Ident(String),

    Plus,
    Minus,
    Star,
    Slash,
    Caret, // ^

    // Moins unaire : jamais produit par tokenize, posé par to_rpn.
    Neg,

    LPar,
    RPar,
}

impl Tok {
    /// Le jeton termine une valeur (nombre, constante, variable, ')').
    fn termine_valeur(&self) -> bool {
        match self {
            Tok::Num(_) | Tok::Pi | Tok::RPar => true,
            Tok::Ident(nom) => Fonction::depuis_nom(nom).is_none(),
            _ => false,
        }
    }

    /// Le jeton peut commencer une valeur (nombre, constante, identifiant, '(').
    fn commence_valeur(&self) -> bool {
        matches!(self, Tok::Num(_) | Tok::Pi | Tok::Ident(_) | Tok::LPar)
    }
}

/// Tokenize une chaîne en jetons.
/// Supporte:
/// - nombres décimaux (ex: 12, 1.5, .5, 2e-3)
/// - opérateurs + - * / ^ et glyphes d’affichage − × ÷
/// - parenthèses ( )
/// - π ou pi
/// - identifiants [a-zA-Z_][a-zA-Z0-9_]* (normalisés en minuscules)
/// - √ (équivaut à ident("sqrt"))
///
/// Les multiplications implicites (2x, 3(4), x sin(x)) sont explicitées ensuite.
pub fn tokenize(s: &str) -> Resultat<Vec<Tok>> {
    let mut out = Vec::new();
    let chars: Vec<char> = s.chars().collect();
    let mut i: usize = 0;

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        let simple = match c {
            '(' => Some(Tok::LPar),
            ')' => Some(Tok::RPar),
            '+' => Some(Tok::Plus),
            '-' | '−' => Some(Tok::Minus),
            '*' | '×' | '·' => Some(Tok::Star),
            '/' | '÷' => Some(Tok::Slash),
            '^' => Some(Tok::Caret),
            'π' => Some(Tok::Pi),
            '√' => Some(Tok::Ident("sqrt".to_string())),
            _ => None,
        };
        if let Some(t) = simple {
            out.push(t);
            i += 1;
            continue;
        }

        // Identifiants ASCII : [a-zA-Z_][a-zA-Z0-9_]*
        if c.is_ascii_alphabetic() || c == '_' {
            let start = i;
            i += 1;
            while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            let word: String = chars[start..i].iter().collect();
            let w = word.to_lowercase();

            if w == "pi" {
                out.push(Tok::Pi);
            } else {
                out.push(Tok::Ident(w));
            }
            continue;
        }

        // Nombre décimal : chiffres [. chiffres] [e [+-] chiffres]
        if c.is_ascii_digit() || c == '.' {
            let start = i;
            while i < chars.len() && chars[i].is_ascii_digit() {
                i += 1;
            }
            if i < chars.len() && chars[i] == '.' {
                i += 1;
                while i < chars.len() && chars[i].is_ascii_digit() {
                    i += 1;
                }
            }
            if let Some(fin) = fin_exposant(&chars, i) {
                i = fin;
            }

            let txt: String = chars[start..i].iter().collect();
            let v = txt
                .parse::<f64>()
                .map_err(|_| Erreur::syntaxe(format!("nombre invalide: '{txt}'")))?;
            out.push(Tok::Num(v));
            continue;
        }

        return Err(Erreur::syntaxe(format!("caractère inattendu: '{c}'")));
    }

    Ok(inserer_produits_implicites(out))
}

/// Exposant “e[+-]chiffres” à la position i : renvoie l’indice de fin s’il est complet.
/// "2e" seul reste 2·e (constante).
fn fin_exposant(chars: &[char], i: usize) -> Option<usize> {
    if i >= chars.len() || !matches!(chars[i], 'e' | 'E') {
        return None;
    }
    let mut j = i + 1;
    if j < chars.len() && matches!(chars[j], '+' | '-') {
        j += 1;
    }
    if j >= chars.len() || !chars[j].is_ascii_digit() {
        return None;
    }
    while j < chars.len() && chars[j].is_ascii_digit() {
        j += 1;
    }
    Some(j)
}

/// "2x" => 2 * x ; "(1)(2)" => (1) * (2) ; "2sin(x)" => 2 * sin(x)
fn inserer_produits_implicites(jetons: Vec<Tok>) -> Vec<Tok> {
    let mut out: Vec<Tok> = Vec::with_capacity(jetons.len());
    for t in jetons {
        if let Some(prev) = out.last() {
            if prev.termine_valeur() && t.commence_valeur() {
                out.push(Tok::Star);
            }
        }
        out.push(t);
    }
    out
}

/// Vrai si `texte` mentionne la variable `nom` (identifiant complet, casse ignorée).
/// Texte non tokenisable : repli sur une recherche de sous-chaîne.
pub fn reference_variable(texte: &str, nom: &str) -> bool {
    let nom = nom.to_lowercase();
    match tokenize(texte) {
        Ok(jetons) => jetons
            .iter()
            .any(|t| matches!(t, Tok::Ident(n) if *n == nom)),
        Err(_) => texte.to_lowercase().contains(&nom),
    }
}

/// Format utilitaire (journal) : liste de jetons en texte.
pub fn format_tokens(tokens: &[Tok]) -> String {
    let mut out = Vec::new();
    for t in tokens {
        let s = match t {
            Tok::Num(v) => format!("{v}"),
            Tok::Pi => "π".to_string(),
            Tok::Ident(name) => name.clone(),

            Tok::Plus => "+".to_string(),
            Tok::Minus => "-".to_string(),
            Tok::Star => "*".to_string(),
            Tok::Slash => "/".to_string(),
            Tok::Caret => "^".to_string(),
            Tok::Neg => "neg".to_string(),

            Tok::LPar => "(".to_string(),
            Tok::RPar => ")".to_string(),
        };
        out.push(s);
    }
    out.join(" ")
}
