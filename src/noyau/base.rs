// src/noyau/base.rs
//
// Bases d’affichage + conversion des numéraux d’un texte.
//
// Règles :
// - un “mot” = suite maximale de [alphanumérique _ .] ; seuls les mots numéraux sont convertis,
//   les identifiants (sin, x, π…) passent tels quels ;
// - hors décimal, un mot commençant par un chiffre se coupe en numéral + identifiant collé
//   ("10x" -> "10" puis "x"), comme la multiplication implicite du moteur ;
// - HEXADECIMAL : chiffres 0-9 A-F (majuscules seulement, pour laisser vivre les identifiants) ;
// - DECIMAL : fraction et exposant acceptés (1.5e-7) ;
// - conversion exacte (rationnels) ; fraction non terminante coupée à CHIFFRES_FRACTION_MAX.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, Zero};

use super::erreur::{Erreur, Resultat};

/// Chiffres après la virgule en sortie hexadécimale / binaire.
pub const CHIFFRES_FRACTION_MAX: usize = 12;

/// Garde-fou pour la sortie décimale (toujours finie depuis 2 ou 16, mais bornée).
const CHIFFRES_FRACTION_DECIMAL_MAX: usize = 40;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Base {
    #[default]
    Decimal,
    Hexadecimal,
    Binaire,
}

impl Base {
    pub fn radix(self) -> u32 {
        match self {
            Base::Decimal => 10,
            Base::Hexadecimal => 16,
            Base::Binaire => 2,
        }
    }

    pub fn nom(self) -> &'static str {
        match self {
            Base::Decimal => "DEC",
            Base::Hexadecimal => "HEX",
            Base::Binaire => "BIN",
        }
    }

    fn chiffre(self, c: char) -> Option<u32> {
        match self {
            Base::Hexadecimal if c.is_ascii_lowercase() => None,
            _ => c.to_digit(self.radix()),
        }
    }
}

/// Réécrit chaque numéral de `texte` de la base `de` vers la base `vers`.
pub fn changer_base(texte: &str, de: Base, vers: Base) -> Resultat<String> {
    if de == vers {
        return Ok(texte.to_string());
    }

    let chars: Vec<char> = texte.chars().collect();
    let mut out = String::with_capacity(texte.len());
    let mut i = 0;

    while i < chars.len() {
        if !est_car_mot(chars[i]) {
            out.push(chars[i]);
            i += 1;
            continue;
        }

        let debut = i;
        while i < chars.len() && est_car_mot(chars[i]) {
            i += 1;
        }
        // exposant signé : "1.5e" suivi de "-7"
        if de == Base::Decimal
            && chars[debut].is_ascii_digit()
            && matches!(chars[i - 1], 'e' | 'E')
            && i + 1 < chars.len()
            && matches!(chars[i], '+' | '-')
            && chars[i + 1].is_ascii_digit()
        {
            i += 1;
            while i < chars.len() && chars[i].is_ascii_digit() {
                i += 1;
            }
        }

        let mot: String = chars[debut..i].iter().collect();
        let (tete, queue) = scinder_numeral(&mot, de);
        match lire_numeral(tete, de)? {
            Some(r) => {
                out.push_str(&ecrire_numeral(&r, vers));
                out.push_str(queue);
            }
            None => out.push_str(&mot),
        }
    }

    Ok(out)
}

fn est_car_mot(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.'
}

/// Hors décimal : sépare les chiffres de tête (et points) de l’identifiant qui suit.
/// BIN ne garde que 0-9 en tête (un chiffre 2-9 y reste une erreur), HEX ajoute A-F.
fn scinder_numeral(mot: &str, base: Base) -> (&str, &str) {
    if base == Base::Decimal || !mot.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        return (mot, "");
    }
    let de_tete = |c: char| {
        c == '.' || c.is_ascii_digit() || (base == Base::Hexadecimal && ('A'..='F').contains(&c))
    };
    let fin = mot.find(|c: char| !de_tete(c)).unwrap_or(mot.len());
    mot.split_at(fin)
}

/* ------------------------ Lecture ------------------------ */

/// Some(valeur) si `mot` est un numéral de `base`, None si c’est un identifiant,
/// Err si c’est un numéral mal formé (mauvais chiffre, deux séparateurs).
fn lire_numeral(mot: &str, base: Base) -> Resultat<Option<BigRational>> {
    if base == Base::Decimal {
        return lire_decimal(mot);
    }

    // numéral “probable” : uniquement des chiffres 0-9 A-F et des points
    let probable = mot
        .chars()
        .all(|c| c == '.' || c.is_ascii_digit() || ('A'..='F').contains(&c));
    if !probable || mot == "." {
        return Ok(None);
    }

    let (ent, frac) = separer(mot)?;
    let radix = BigInt::from(base.radix());
    let mut valeur = BigRational::zero();

    for c in ent.chars().chain(frac.chars()) {
        let d = base
            .chiffre(c)
            .ok_or_else(|| Erreur::syntaxe(format!("chiffre '{c}' invalide en {}", base.nom())))?;
        valeur = valeur * BigRational::from_integer(radix.clone())
            + BigRational::from_integer(BigInt::from(d));
    }
    let echelle = num_traits::pow(radix, frac.chars().count());
    Ok(Some(valeur / BigRational::from_integer(echelle)))
}

/// Numéral décimal : chiffres [. chiffres] [e [+-] chiffres].
fn lire_decimal(mot: &str) -> Resultat<Option<BigRational>> {
    let commence = mot.starts_with(|c: char| c.is_ascii_digit() || c == '.');
    if !commence || mot == "." {
        return Ok(None);
    }

    let (mantisse, exposant) = match mot.find(|c: char| c == 'e' || c == 'E') {
        Some(p) => (&mot[..p], Some(&mot[p + 1..])),
        None => (mot, None),
    };
    if !mantisse.chars().all(|c| c == '.' || c.is_ascii_digit()) {
        // "2x", "3sin" : pas un numéral, le moteur fera la multiplication implicite
        return Ok(None);
    }
    let exposant: i64 = match exposant {
        Some(e) => match e.parse() {
            Ok(v) => v,
            // "2e" / "2ex" : constante e ou identifiant collé
            Err(_) => return Ok(None),
        },
        None => 0,
    };

    let (ent, frac) = separer(mantisse)?;
    let chiffres = format!("{ent}{frac}");
    let n = if chiffres.is_empty() {
        BigInt::zero()
    } else {
        chiffres
            .parse::<BigInt>()
            .map_err(|_| Erreur::syntaxe(format!("numéral invalide: {mot}")))?
    };

    let dix = BigInt::from(10);
    let decalage = exposant - frac.len() as i64;
    let puissance = num_traits::pow(dix, decalage.unsigned_abs() as usize);
    let r = if decalage >= 0 {
        BigRational::from_integer(n * puissance)
    } else {
        BigRational::new(n, puissance)
    };
    Ok(Some(r))
}

fn separer(mot: &str) -> Resultat<(&str, &str)> {
    let mut morceaux = mot.splitn(3, '.');
    let ent = morceaux.next().unwrap_or("");
    let frac = morceaux.next().unwrap_or("");
    if morceaux.next().is_some() {
        return Err(Erreur::syntaxe(format!("numéral invalide: {mot}")));
    }
    Ok((ent, frac))
}

/* ------------------------ Écriture ------------------------ */

fn ecrire_numeral(r: &BigRational, base: Base) -> String {
    let radix = base.radix();
    let max_frac = match base {
        Base::Decimal => CHIFFRES_FRACTION_DECIMAL_MAX,
        _ => CHIFFRES_FRACTION_MAX,
    };

    let signe = if r.is_negative() { "-" } else { "" };
    let r = r.abs();
    let ent = r.trunc();
    let mut frac = &r - &ent;

    let mut out = format!("{signe}{}", ent.to_integer().to_str_radix(radix).to_uppercase());
    if frac.is_zero() {
        return out;
    }

    out.push('.');
    let b = BigRational::from_integer(BigInt::from(radix));
    for _ in 0..max_frac {
        frac = frac * &b;
        let d = frac.trunc();
        out.push_str(&d.to_integer().to_str_radix(radix).to_uppercase());
        frac = frac - d;
        if frac.is_zero() {
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identite_si_meme_base() {
        assert_eq!(
            changer_base("1F+sin(x)", Base::Hexadecimal, Base::Hexadecimal).unwrap(),
            "1F+sin(x)"
        );
    }

    #[test]
    fn hexa_vers_decimal_garde_les_identifiants() {
        assert_eq!(
            changer_base("1F+sin(x)*A.8", Base::Hexadecimal, Base::Decimal).unwrap(),
            "31+sin(x)*10.5"
        );
    }

    #[test]
    fn binaire_vers_decimal() {
        assert_eq!(changer_base("101-0.01", Base::Binaire, Base::Decimal).unwrap(), "5-0.25");
    }

    #[test]
    fn decimal_vers_bases() {
        assert_eq!(changer_base("255", Base::Decimal, Base::Hexadecimal).unwrap(), "FF");
        assert_eq!(changer_base("-2.5", Base::Decimal, Base::Binaire).unwrap(), "-10.1");
        assert_eq!(changer_base("1.5e3", Base::Decimal, Base::Hexadecimal).unwrap(), "5DC");
        assert_eq!(changer_base("2.5e-1", Base::Decimal, Base::Binaire).unwrap(), "0.01");
    }

    #[test]
    fn fraction_non_terminante_coupee() {
        let s = changer_base("0.1", Base::Decimal, Base::Binaire).unwrap();
        assert_eq!(s.len(), 2 + CHIFFRES_FRACTION_MAX);
        assert!(s.starts_with("0.0001100110"));
    }

    #[test]
    fn numeral_mal_forme() {
        assert!(changer_base("12", Base::Binaire, Base::Decimal).is_err());
        assert!(changer_base("1.2.3", Base::Hexadecimal, Base::Decimal).is_err());
    }

    #[test]
    fn multiplication_implicite_preservee() {
        assert_eq!(changer_base("2x", Base::Decimal, Base::Binaire).unwrap(), "2x");
        assert_eq!(changer_base("2e", Base::Decimal, Base::Binaire).unwrap(), "2e");
    }

    #[test]
    fn numeral_colle_a_un_identifiant() {
        let hexa = |s| changer_base(s, Base::Hexadecimal, Base::Decimal).unwrap();
        assert_eq!(hexa("10x"), "16x");
        assert_eq!(hexa("10π"), "16π");
        assert_eq!(hexa("1Fsin(x)"), "31sin(x)");
        assert_eq!(hexa("2e"), "2e");
        assert_eq!(hexa("Fx+A"), "Fx+10");

        assert_eq!(changer_base("10x", Base::Binaire, Base::Decimal).unwrap(), "2x");
        assert_eq!(changer_base("1.1y", Base::Binaire, Base::Decimal).unwrap(), "1.5y");
        assert!(changer_base("12x", Base::Binaire, Base::Decimal).is_err());
        assert!(changer_base("1Ex", Base::Binaire, Base::Decimal).is_ok());
    }
}
