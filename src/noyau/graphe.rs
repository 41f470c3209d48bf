//! Noyau: tracé (échantillonnage de points)
//!
//! texte -> découpe "=" -> base -> décimal -> Forme -> compilation -> balayage
//!
//! - Un seul cadre de variables pour tout le balayage (Portee), X / Y redéfinis à chaque échantillon.
//! - Annulation coopérative : le jeton est consulté avant chaque échantillon.
//! - Un échantillon qui échoue est ignoré ; seule la préparation (base, compilation) fait échouer la tâche.
//! - La tâche tourne sur son propre fil avec une copie de l’environnement du solveur.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;

use log::{debug, info, warn};

use super::base::{changer_base, Base};
use super::equation::{classer_texte, Forme};
use super::erreur::{Erreur, Resultat};
use super::eval::{est_operateur, Solveur};
use super::expr::Expr;
use super::symboles::Symboles;

/* ------------------------ Réglages ------------------------ */

pub const ZOOM_DEFAUT: f32 = 1.0;
pub const ZOOM_MIN: f32 = 1e-3;
pub const ZOOM_MAX: f32 = 1e3;

/// Pas = facteur × zoom.
pub const FACTEUR_PAS_EXPLICITE: f64 = 0.1;
pub const FACTEUR_PAS_IMPLICITE: f64 = 0.2;

/// Bande relative ±2 % du test implicite.
const BANDE_BASSE: f64 = 0.98;
const BANDE_HAUTE: f64 = 1.02;

/// Marge sur le nombre de pas (erreur d’arrondi de (fin - début) / pas).
const MARGE_PAS: f64 = 1e-9;

/// Positions par axe au-delà desquelles le tracé est refusé.
pub const POSITIONS_MAX: u64 = 100_000_000;

const VAR_X: &str = "X";
const VAR_Y: &str = "Y";

/* ------------------------ Données ------------------------ */

/// Point tracé ; NaN / infini marquent une coupure de la courbe.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn est_defini(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Série immuable, dans l’ordre de génération.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Serie(Vec<Point>);

impl Serie {
    pub fn points(&self) -> &[Point] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Point> {
        self.0.iter()
    }
}

/// Instantané des réglages au lancement : les changements ultérieurs n’affectent pas la tâche.
#[derive(Clone, Debug, PartialEq)]
pub struct RequeteGraphe {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
    pub zoom: f32,
    pub equation: String,
    pub base: Base,
}

impl RequeteGraphe {
    fn pas_explicite(&self) -> f64 {
        FACTEUR_PAS_EXPLICITE * self.zoom as f64
    }

    fn pas_implicite(&self) -> f64 {
        FACTEUR_PAS_IMPLICITE * self.zoom as f64
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EtatTache {
    EnAttente,
    EnCours,
    Annulee,
    Terminee,
    Echec,
}

/// Issue unique d’une tâche de tracé.
#[derive(Clone, Debug, PartialEq)]
pub enum Issue {
    Terminee(Serie),
    Annulee,
    Echec(Erreur),
}

impl Issue {
    fn etat(&self) -> EtatTache {
        match self {
            Issue::Terminee(_) => EtatTache::Terminee,
            Issue::Annulee => EtatTache::Annulee,
            Issue::Echec(_) => EtatTache::Echec,
        }
    }

    /// Forme “rappel” : None pour annulée ou en échec.
    pub fn serie(self) -> Option<Serie> {
        match self {
            Issue::Terminee(s) => Some(s),
            Issue::Annulee | Issue::Echec(_) => None,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct JetonAnnulation(Arc<AtomicBool>);

impl JetonAnnulation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn annuler(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn est_annule(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    fn verifier(&self) -> Resultat<()> {
        if self.est_annule() {
            return Err(Erreur::Annulee);
        }
        Ok(())
    }
}

/* ------------------------ Échantillonnage ------------------------ */

/// Nombre de positions de `depart` à `arrivee` (bornes incluses), saturé à u64::MAX.
fn nombre_positions(depart: f32, arrivee: f32, pas: f64) -> u64 {
    let n = ((arrivee as f64 - depart as f64) / pas + MARGE_PAS).floor();
    if n.is_finite() && n >= 0.0 {
        (n as u64).saturating_add(1)
    } else {
        0
    }
}

/// Positions de `depart` vers `arrivee` (bornes incluses), calculées par indice.
/// `pas` négatif : balayage descendant.
fn balayage(depart: f32, arrivee: f32, pas: f64) -> impl Iterator<Item = f32> {
    let n = nombre_positions(depart, arrivee, pas);
    let depart = depart as f64;
    (0..n).map(move |k| (depart + k as f64 * pas) as f32)
}

fn verifier_axe(axe: char, depart: f32, arrivee: f32, pas: f64) -> Resultat<()> {
    let n = nombre_positions(depart, arrivee, pas);
    if n > POSITIONS_MAX {
        return Err(Erreur::syntaxe(format!(
            "axe {axe} trop large: {n} positions (max {POSITIONS_MAX})"
        )));
    }
    Ok(())
}

/// Test d’appartenance implicite, conservé tel quel :
/// deux côtés négatifs -> comparaison en simple précision, inégalités miroir ;
/// sinon -> double précision.
fn dans_la_bande(gauche: f32, droite: f32) -> bool {
    if gauche < 0.0 && droite < 0.0 {
        gauche * BANDE_BASSE as f32 >= droite && gauche * BANDE_HAUTE as f32 <= droite
    } else {
        let (g, d) = (gauche as f64, droite as f64);
        g * BANDE_BASSE <= d && g * BANDE_HAUTE >= d
    }
}

/// Découpe, convertit en décimal, classe et compile (échec => toute la tâche échoue).
pub fn preparer(equation: &str, base: Base) -> Resultat<Forme<Expr>> {
    let forme = classer_texte(equation, |cote| changer_base(cote, base, Base::Decimal))?;
    debug!("forme {forme:?}");
    forme.compiler()
}

/// Balayage complet. `symboles` retrouve sa profondeur de cadres quelle que soit l’issue.
pub fn echantillonner(
    requete: &RequeteGraphe,
    symboles: &mut Symboles,
    jeton: &JetonAnnulation,
) -> Resultat<Serie> {
    let forme = preparer(&requete.equation, requete.base)?;

    match &forme {
        Forme::ExpliciteYdeX(_) => {
            verifier_axe('X', requete.min_x, requete.max_x, requete.pas_explicite())?
        }
        Forme::ExpliciteXdeY(_) => {
            verifier_axe('Y', requete.min_y, requete.max_y, requete.pas_explicite())?
        }
        Forme::Implicite(..) => {
            let pas = requete.pas_implicite();
            verifier_axe('X', requete.min_x, requete.max_x, pas)?;
            verifier_axe('Y', requete.max_y, requete.min_y, -pas)?;
        }
    }

    let mut portee = symboles.portee();
    let mut points = Vec::new();

    match &forme {
        Forme::ExpliciteYdeX(f) => {
            for x in balayage(requete.min_x, requete.max_x, requete.pas_explicite()) {
                jeton.verifier()?;
                portee.define(VAR_X, x as f64);
                match portee.evaluer_reel(f) {
                    Ok(y) => points.push(Point::new(x, y as f32)),
                    Err(e) => debug!("échantillon x={x} ignoré: {e}"),
                }
            }
        }
        Forme::ExpliciteXdeY(f) => {
            for y in balayage(requete.min_y, requete.max_y, requete.pas_explicite()) {
                jeton.verifier()?;
                portee.define(VAR_Y, y as f64);
                match portee.evaluer_reel(f) {
                    Ok(x) => points.push(Point::new(x as f32, y)),
                    Err(e) => debug!("échantillon y={y} ignoré: {e}"),
                }
            }
        }
        Forme::Implicite(gauche, droite) => {
            let pas = requete.pas_implicite();
            for x in balayage(requete.min_x, requete.max_x, pas) {
                for y in balayage(requete.max_y, requete.min_y, -pas) {
                    jeton.verifier()?;
                    portee.define(VAR_X, x as f64);
                    portee.define(VAR_Y, y as f64);
                    let cotes = portee
                        .evaluer_reel(gauche)
                        .and_then(|g| Ok((g, portee.evaluer_reel(droite)?)));
                    match cotes {
                        Ok((g, d)) => {
                            if dans_la_bande(g as f32, d as f32) {
                                points.push(Point::new(x, y));
                            }
                        }
                        Err(e) => debug!("échantillon ({x}, {y}) ignoré: {e}"),
                    }
                }
            }
        }
    }

    Ok(Serie(points))
}

/* ------------------------ Tâche ------------------------ */

type EtatPartage = Arc<Mutex<EtatTache>>;

fn lire_etat(etat: &EtatPartage) -> EtatTache {
    *etat.lock().unwrap_or_else(PoisonError::into_inner)
}

fn fixer_etat(etat: &EtatPartage, nouvel: EtatTache) {
    *etat.lock().unwrap_or_else(PoisonError::into_inner) = nouvel;
}

/// Lance le balayage sur un fil dédié ; `livrer` reçoit l’issue exactement une fois.
fn demarrer<F>(
    requete: RequeteGraphe,
    mut symboles: Symboles,
    livrer: F,
) -> Option<(JetonAnnulation, EtatPartage)>
where
    F: FnOnce(Issue) + Send + 'static,
{
    let jeton = JetonAnnulation::new();
    let etat: EtatPartage = Arc::new(Mutex::new(EtatTache::EnAttente));

    let (jeton_fil, etat_fil) = (jeton.clone(), Arc::clone(&etat));
    let lancement = thread::Builder::new()
        .name("trace-graphe".to_string())
        .spawn(move || {
            fixer_etat(&etat_fil, EtatTache::EnCours);
            info!("tracé lancé: {requete:?}");

            let issue = match echantillonner(&requete, &mut symboles, &jeton_fil) {
                Ok(serie) => {
                    info!("tracé terminé: {} points", serie.len());
                    Issue::Terminee(serie)
                }
                Err(Erreur::Annulee) => {
                    info!("tracé annulé");
                    Issue::Annulee
                }
                Err(e) => {
                    warn!("tracé en échec: {e}");
                    Issue::Echec(e)
                }
            };

            fixer_etat(&etat_fil, issue.etat());
            livrer(issue);
        });

    match lancement {
        Ok(_) => Some((jeton, etat)),
        Err(e) => {
            warn!("impossible de lancer le fil de tracé: {e}");
            None
        }
    }
}

/// Tâche de tracé en cours. La lâcher demande son annulation.
pub struct TacheGraphe {
    jeton: JetonAnnulation,
    etat: EtatPartage,
    recepteur: Receiver<Issue>,
    livree: bool,
}

impl TacheGraphe {
    pub fn annuler(&self) {
        self.jeton.annuler();
    }

    pub fn jeton(&self) -> JetonAnnulation {
        self.jeton.clone()
    }

    pub fn etat(&self) -> EtatTache {
        lire_etat(&self.etat)
    }

    /// Non bloquant : Some(issue) une seule fois, quand le fil a fini.
    /// Un fil disparu sans livrer donne un échec.
    pub fn essayer_issue(&mut self) -> Option<Issue> {
        if self.livree {
            return None;
        }
        let issue = match self.recepteur.try_recv() {
            Ok(issue) => issue,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => {
                warn!("fil de tracé interrompu sans issue");
                fixer_etat(&self.etat, EtatTache::Echec);
                Issue::Echec(Erreur::syntaxe("fil de tracé interrompu"))
            }
        };
        self.livree = true;
        Some(issue)
    }

    /// Bloquant.
    pub fn attendre(self) -> Issue {
        self.recepteur
            .recv()
            .unwrap_or_else(|_| Issue::Echec(Erreur::syntaxe("fil de tracé interrompu")))
    }
}

impl Drop for TacheGraphe {
    fn drop(&mut self) {
        self.jeton.annuler();
    }
}

/* ------------------------ Module ------------------------ */

/// Réglages vivants du tracé (domaine, plage, zoom).
#[derive(Clone, Debug, PartialEq)]
pub struct ModuleGraphe {
    min_x: f32,
    max_x: f32,
    min_y: f32,
    max_y: f32,
    zoom: f32,
}

impl Default for ModuleGraphe {
    fn default() -> Self {
        Self {
            min_x: -10.0,
            max_x: 10.0,
            min_y: -10.0,
            max_y: 10.0,
            zoom: ZOOM_DEFAUT,
        }
    }
}

impl ModuleGraphe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_domaine(&mut self, min: f32, max: f32) {
        self.min_x = min;
        self.max_x = max;
    }

    pub fn set_plage(&mut self, min: f32, max: f32) {
        self.min_y = min;
        self.max_y = max;
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(ZOOM_MIN, ZOOM_MAX);
        } else {
            warn!("zoom non fini ignoré: {zoom}");
        }
    }

    pub fn domaine(&self) -> (f32, f32) {
        (self.min_x, self.max_x)
    }

    pub fn plage(&self) -> (f32, f32) {
        (self.min_y, self.max_y)
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Préconditions : pas d’opérateur ni de "(" final, pas de matrices, domaine non dégénéré.
    pub fn peut_tracer(&self, solveur: &Solveur, texte: &str) -> bool {
        let fin_incomplete = texte
            .trim_end()
            .chars()
            .last()
            .is_some_and(|c| est_operateur(c) || c == '(');
        !fin_incomplete && !solveur.contient_matrices(texte) && self.min_x != self.max_x
    }

    pub fn requete(&self, solveur: &Solveur, texte: &str) -> RequeteGraphe {
        RequeteGraphe {
            min_x: self.min_x,
            max_x: self.max_x,
            min_y: self.min_y,
            max_y: self.max_y,
            zoom: self.zoom,
            equation: texte.to_string(),
            base: solveur.base(),
        }
    }

    /// Lance un tracé ; None si les préconditions ne sont pas remplies (aucune tâche).
    pub fn lancer(&self, solveur: &Solveur, texte: &str) -> Option<TacheGraphe> {
        if !self.peut_tracer(solveur, texte) {
            debug!("pas de tracé pour {texte:?}");
            return None;
        }

        let (emetteur, recepteur) = mpsc::channel();
        let (jeton, etat) = demarrer(
            self.requete(solveur, texte),
            solveur.contexte(),
            move |issue| {
                // le demandeur a pu lâcher la tâche entre-temps
                let _ = emetteur.send(issue);
            },
        )?;

        Some(TacheGraphe {
            jeton,
            etat,
            recepteur,
            livree: false,
        })
    }

    /// Variante à rappel : `rappel` reçoit Some(série) ou None (annulée / échec), une seule fois.
    /// Rend le jeton d’annulation, ou None si aucune tâche n’est lancée.
    pub fn mettre_a_jour<F>(
        &self,
        solveur: &Solveur,
        texte: &str,
        rappel: F,
    ) -> Option<JetonAnnulation>
    where
        F: FnOnce(Option<Serie>) + Send + 'static,
    {
        if !self.peut_tracer(solveur, texte) {
            return None;
        }
        let (jeton, _) = demarrer(
            self.requete(solveur, texte),
            solveur.contexte(),
            move |issue| rappel(issue.serie()),
        )?;
        Some(jeton)
    }
}
