// src/noyau/localisation.rs
//
// Substitution de glyphes, sans sémantique numérique :
// - localiser   : glyphes locaux -> ASCII (entrée du moteur)
// - relocaliser : ASCII -> glyphes locaux (affichage)

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Localisateur {
    // (glyphe local, glyphe ASCII)
    table: Vec<(char, char)>,
}

impl Localisateur {
    pub fn new(table: Vec<(char, char)>) -> Self {
        Self { table }
    }

    /// Chiffres arabes orientaux (٠ … ٩) et séparateur décimal arabe (٫).
    pub fn chiffres_arabes_orientaux() -> Self {
        let mut table: Vec<(char, char)> = ('٠'..='٩').zip('0'..='9').collect();
        table.push(('٫', '.'));
        Self { table }
    }

    pub fn localiser(&self, texte: &str) -> String {
        texte
            .chars()
            .map(|c| {
                self.table
                    .iter()
                    .find(|(local, _)| *local == c)
                    .map_or(c, |(_, ascii)| *ascii)
            })
            .collect()
    }

    pub fn relocaliser(&self, texte: &str) -> String {
        texte
            .chars()
            .map(|c| {
                self.table
                    .iter()
                    .find(|(_, ascii)| *ascii == c)
                    .map_or(c, |(local, _)| *local)
            })
            .collect()
    }
}
