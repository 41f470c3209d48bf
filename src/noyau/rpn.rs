// src/noyau/rpn.rs
//
// Shunting-yard -> RPN -> AST
// Objectif:
// - Convertir une suite de Tok en RPN (postfix)
// - Puis reconstruire Expr
//
// Règles:
// - Ident(name):
//    - si name est une fonction connue => opérateur préfixe (postfixé en RPN)
//    - "e" / "i" => constantes
//    - sinon => variable (Expr::Var)
// - Moins unaire:
//    - si '-' arrive quand on n’attend PAS une valeur => Tok::Neg (préfixe)
//    - Neg lie moins fort que ^ : "-2^2" = -(2^2), "2^-1" = 2^(-1)

use super::erreur::{Erreur, Resultat};
use super::expr::{Expr, Fonction};
use super::jetons::Tok;

/// Précédence des opérateurs préfixes (moins unaire, fonction sans parenthèses).
const PREFIXE: i32 = 3;

fn precedence(t: &Tok) -> i32 {
    match t {
        Tok::Plus | Tok::Minus => 1,
        Tok::Star | Tok::Slash => 2,
        Tok::Neg | Tok::Ident(_) => PREFIXE,
        Tok::Caret => 4,
        _ => 0,
    }
}

fn is_right_associative(t: &Tok) -> bool {
    matches!(t, Tok::Caret)
}

fn is_fonction_ident(name: &str) -> bool {
    Fonction::depuis_nom(name).is_some()
}

/// Convertit une suite de jetons en RPN (notation polonaise inversée).
///
/// Exemple:
///   tokens: [Ident("sin"), LPar, Pi, Slash, Num(2), RPar]
///   rpn:    [Pi, Num(2), Slash, Ident("sin")]
pub fn to_rpn(tokens: &[Tok]) -> Resultat<Vec<Tok>> {
    let mut out: Vec<Tok> = Vec::new();
    let mut ops: Vec<Tok> = Vec::new();

    // “valeur” = un atome ou une expression fermée.
    // Sert à détecter le moins unaire.
    let mut prev_was_value = false;

    for tok in tokens.iter().cloned() {
        match tok {
            Tok::Num(_) | Tok::Pi => {
                out.push(tok);
                prev_was_value = true;
            }

            Tok::Ident(name) => {
                if is_fonction_ident(&name) {
                    // préfixe : ne dépile rien en entrant
                    ops.push(Tok::Ident(name));
                    prev_was_value = false;
                } else {
                    out.push(Tok::Ident(name));
                    prev_was_value = true;
                }
            }

            Tok::LPar => {
                ops.push(tok);
                prev_was_value = false;
            }

            Tok::RPar => {
                let mut ouverte = false;
                while let Some(top) = ops.pop() {
                    if matches!(top, Tok::LPar) {
                        ouverte = true;
                        break;
                    }
                    out.push(top);
                }
                if !ouverte {
                    return Err(Erreur::syntaxe("parenthèse fermante sans ouvrante"));
                }

                // si une fonction est au sommet, elle s’applique au groupe qui vient de se fermer
                if let Some(Tok::Ident(name)) = ops.last() {
                    if is_fonction_ident(name.as_str()) {
                        if let Some(f) = ops.pop() {
                            out.push(f);
                        }
                    }
                }

                prev_was_value = true;
            }

            Tok::Minus if !prev_was_value => {
                ops.push(Tok::Neg);
                prev_was_value = false;
            }

            Tok::Plus if !prev_was_value => {
                // plus unaire : sans effet
            }

            Tok::Plus | Tok::Minus | Tok::Star | Tok::Slash | Tok::Caret | Tok::Neg => {
                if !prev_was_value {
                    return Err(Erreur::syntaxe("opérande manquant"));
                }

                // dépile tant que:
                // - on n'est pas bloqué par '('
                // - et la précédence/associativité exige de sortir l'opérateur du haut
                while let Some(top) = ops.last() {
                    if matches!(top, Tok::LPar) {
                        break;
                    }

                    let p_top = precedence(top);
                    let p_tok = precedence(&tok);

                    let doit_pop = if is_right_associative(&tok) {
                        p_top > p_tok
                    } else {
                        p_top >= p_tok
                    };

                    if !doit_pop {
                        break;
                    }
                    if let Some(top) = ops.pop() {
                        out.push(top);
                    }
                }

                ops.push(tok);
                prev_was_value = false;
            }
        }
    }

    // vide la pile ops
    while let Some(op) = ops.pop() {
        if matches!(op, Tok::LPar) {
            return Err(Erreur::syntaxe("parenthèses non fermées"));
        }
        out.push(op);
    }

    Ok(out)
}

/// Construit une Expr à partir d’une RPN.
pub fn from_rpn(rpn: &[Tok]) -> Resultat<Expr> {
    let invalide = || Erreur::syntaxe("expression invalide");
    let mut st: Vec<Expr> = Vec::new();

    for tok in rpn.iter().cloned() {
        match tok {
            Tok::Num(v) => st.push(Expr::Num(v)),
            Tok::Pi => st.push(Expr::Pi),

            Tok::Plus | Tok::Minus | Tok::Star | Tok::Slash | Tok::Caret => {
                let b = Box::new(st.pop().ok_or_else(invalide)?);
                let a = Box::new(st.pop().ok_or_else(invalide)?);

                let e = match tok {
                    Tok::Plus => Expr::Add(a, b),
                    Tok::Minus => Expr::Sub(a, b),
                    Tok::Star => Expr::Mul(a, b),
                    Tok::Slash => Expr::Div(a, b),
                    _ => Expr::Pow(a, b),
                };
                st.push(e);
            }

            Tok::Neg => {
                let x = st.pop().ok_or_else(invalide)?;
                st.push(Expr::Neg(Box::new(x)));
            }

            Tok::Ident(name) => match Fonction::depuis_nom(&name) {
                Some(f) => {
                    let x = st
                        .pop()
                        .ok_or_else(|| Erreur::syntaxe(format!("{name} sans argument")))?;
                    st.push(Expr::Fonc(f, Box::new(x)));
                }
                None => st.push(match name.as_str() {
                    "e" => Expr::E,
                    "i" => Expr::I,
                    _ => Expr::Var(name),
                }),
            },

            Tok::LPar | Tok::RPar => {
                return Err(Erreur::syntaxe("parenthèse inattendue en RPN"))
            }
        }
    }

    if st.len() != 1 {
        return Err(invalide());
    }
    st.pop().ok_or_else(invalide)
}
