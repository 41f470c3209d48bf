// src/noyau/expr.rs
//
// AST numérique (flottants, évaluation complexe).
// - Num   : constante décimale
// - Pi, E : constantes
// - I     : unité imaginaire
// - Var   : variable (valeur lue dans les cadres de Symboles au moment de l’évaluation)
//
// IMPORTANT :
// - Entrée réelle => chemin réel (pas de résidu imaginaire : (-2)^2 = 4, pas 4+0.0000000000000005i).
// - Toute composante non finie est une erreur (jamais une valeur).

use num_complex::Complex64;
use num_traits::Zero;

use super::erreur::{Erreur, Resultat};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fonction {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Ln,
    Log,
    Exp,
    Sqrt,
    Abs,
}

impl Fonction {
    /// Identificateurs reconnus comme fonctions (unaire).
    pub fn depuis_nom(nom: &str) -> Option<Fonction> {
        use Fonction::*;
        let f = match nom {
            "sin" => Sin,
            "cos" => Cos,
            "tan" => Tan,
            "asin" | "arcsin" => Asin,
            "acos" | "arccos" => Acos,
            "atan" | "arctan" => Atan,
            "sinh" => Sinh,
            "cosh" => Cosh,
            "tanh" => Tanh,
            "ln" => Ln,
            "log" => Log,
            "exp" => Exp,
            "sqrt" => Sqrt,
            "abs" => Abs,
            _ => return None,
        };
        Some(f)
    }

    fn appliquer(self, z: Complex64) -> Complex64 {
        use Fonction::*;

        if z.im == 0.0 {
            if let Some(v) = self.appliquer_reel(z.re) {
                return Complex64::new(v, 0.0);
            }
        }
        // -0.0 choisirait l’autre branche de coupure (√-1 = -i)
        let z = if z.im == 0.0 { Complex64::new(z.re, 0.0) } else { z };

        match self {
            Sin => z.sin(),
            Cos => z.cos(),
            Tan => z.tan(),
            Asin => z.asin(),
            Acos => z.acos(),
            Atan => z.atan(),
            Sinh => z.sinh(),
            Cosh => z.cosh(),
            Tanh => z.tanh(),
            Ln => z.ln(),
            Log => z.log10(),
            Exp => z.exp(),
            Sqrt => z.sqrt(),
            Abs => Complex64::new(z.norm(), 0.0),
        }
    }

    /// Chemin réel : None hors domaine réel (on passe alors en complexe).
    fn appliquer_reel(self, x: f64) -> Option<f64> {
        use Fonction::*;
        let v = match self {
            Sin => x.sin(),
            Cos => x.cos(),
            Tan => x.tan(),
            Asin | Acos if x.abs() > 1.0 => return None,
            Asin => x.asin(),
            Acos => x.acos(),
            Atan => x.atan(),
            Sinh => x.sinh(),
            Cosh => x.cosh(),
            Tanh => x.tanh(),
            Ln | Log if x <= 0.0 => return None,
            Ln => x.ln(),
            Log => x.log10(),
            Exp => x.exp(),
            Sqrt if x < 0.0 => return None,
            Sqrt => x.sqrt(),
            Abs => x.abs(),
        };
        Some(v)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Num(f64),
    Pi,
    E,
    I,

    Var(String),

    Neg(Box<Expr>),
    Fonc(Fonction, Box<Expr>),

    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    Pow(Box<Expr>, Box<Expr>),
}

impl Expr {
    /// Évalue l’arbre ; `lire` donne la valeur d’une variable (None => inconnue).
    pub fn evaluer<F>(&self, lire: &F) -> Resultat<Complex64>
    where
        F: Fn(&str) -> Option<f64>,
    {
        let z = self.evaluer_brut(lire)?;
        if !z.re.is_finite() || !z.im.is_finite() {
            return Err(Erreur::syntaxe("résultat non fini"));
        }
        Ok(z)
    }

    fn evaluer_brut<F>(&self, lire: &F) -> Resultat<Complex64>
    where
        F: Fn(&str) -> Option<f64>,
    {
        use Expr::*;

        let z = match self {
            Num(v) => Complex64::new(*v, 0.0),
            Pi => Complex64::new(std::f64::consts::PI, 0.0),
            E => Complex64::new(std::f64::consts::E, 0.0),
            I => Complex64::i(),

            Var(nom) => {
                let v = lire(nom)
                    .ok_or_else(|| Erreur::syntaxe(format!("variable inconnue: {nom}")))?;
                Complex64::new(v, 0.0)
            }

            Neg(x) => {
                let z = x.evaluer_brut(lire)?;
                if z.im == 0.0 {
                    Complex64::new(-z.re, 0.0)
                } else {
                    -z
                }
            }
            Fonc(f, x) => f.appliquer(x.evaluer_brut(lire)?),

            Add(a, b) => a.evaluer_brut(lire)? + b.evaluer_brut(lire)?,
            Sub(a, b) => a.evaluer_brut(lire)? - b.evaluer_brut(lire)?,
            Mul(a, b) => mul(a.evaluer_brut(lire)?, b.evaluer_brut(lire)?),
            Div(a, b) => div(a.evaluer_brut(lire)?, b.evaluer_brut(lire)?)?,
            Pow(a, b) => puissance(a.evaluer_brut(lire)?, b.evaluer_brut(lire)?),
        };
        Ok(z)
    }
}

fn mul(a: Complex64, b: Complex64) -> Complex64 {
    if a.im == 0.0 && b.im == 0.0 {
        return Complex64::new(a.re * b.re, 0.0);
    }
    a * b
}

fn div(a: Complex64, b: Complex64) -> Resultat<Complex64> {
    if b.is_zero() {
        return Err(Erreur::syntaxe("division par zéro"));
    }
    if a.im == 0.0 && b.im == 0.0 {
        return Ok(Complex64::new(a.re / b.re, 0.0));
    }
    Ok(a / b)
}

/// a^b : exposant entier => multiplications (exact) ; base réelle positive => powf ;
/// sinon forme complexe générale.
fn puissance(a: Complex64, b: Complex64) -> Complex64 {
    if b.im == 0.0 && b.re.fract() == 0.0 && b.re.abs() <= i32::MAX as f64 {
        let n = b.re as i32;
        if a.im == 0.0 {
            return Complex64::new(a.re.powi(n), 0.0);
        }
        return a.powi(n);
    }
    if a.im == 0.0 && b.im == 0.0 && a.re >= 0.0 {
        return Complex64::new(a.re.powf(b.re), 0.0);
    }
    if a.is_zero() {
        return Complex64::zero();
    }
    a.powc(b)
}
