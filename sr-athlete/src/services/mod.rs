//! Domain services
//!
//! CRUD with the athlete→team read-time join, participation tracking and the
//! import reconcilers. Built once from [`Repositories`] at startup.

pub mod athletes;
pub mod certificates;
pub mod import_athlete;
pub mod import_team;
pub mod locks;
pub mod merge;
pub mod participation;
pub mod teams;

pub use athletes::AthleteService;
pub use certificates::CertificateService;
pub use import_athlete::AthleteImporter;
pub use import_team::TeamImporter;
pub use locks::ImportLocks;
pub use participation::ParticipationTracker;
pub use teams::TeamService;

use crate::repository::Repositories;

#[derive(Clone)]
pub struct Services {
    pub athletes: AthleteService,
    pub teams: TeamService,
    pub certificates: CertificateService,
    pub participation: ParticipationTracker,
    pub athlete_import: AthleteImporter,
    pub team_import: TeamImporter,
}

impl Services {
    pub fn new(repos: &Repositories) -> Self {
        let locks = ImportLocks::new();
        let athletes = AthleteService::new(repos.athletes.clone(), repos.teams.clone());
        let teams = TeamService::new(repos.teams.clone());
        let certificates = CertificateService::new(repos.certificates.clone());
        let participation =
            ParticipationTracker::new(repos.athletes.clone(), repos.teams.clone(), athletes.clone());
        let team_import = TeamImporter::new(teams.clone(), participation.clone(), locks.clone());
        let athlete_import = AthleteImporter::new(
            repos.athletes.clone(),
            athletes.clone(),
            teams.clone(),
            team_import.clone(),
            participation.clone(),
            locks,
        );

        Self {
            athletes,
            teams,
            certificates,
            participation,
            athlete_import,
            team_import,
        }
    }
}
