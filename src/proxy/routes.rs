//! Route table: local English routes onto the backend's French resources
//!
//! Each entry is one (resource, method) pair. The forwarder is generic; the
//! only per-route knowledge lives here.

use axum::routing::MethodFilter;

/// Query parameter that switches a list route to its search endpoint
pub const SEARCH_PARAM: &str = "keyword";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    Post,
    Put,
    Delete,
}

impl Verb {
    pub fn method(&self) -> reqwest::Method {
        match self {
            Verb::Get => reqwest::Method::GET,
            Verb::Post => reqwest::Method::POST,
            Verb::Put => reqwest::Method::PUT,
            Verb::Delete => reqwest::Method::DELETE,
        }
    }

    pub fn filter(&self) -> MethodFilter {
        match self {
            Verb::Get => MethodFilter::GET,
            Verb::Post => MethodFilter::POST,
            Verb::Put => MethodFilter::PUT,
            Verb::Delete => MethodFilter::DELETE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// `Authorization` header required, forwarded verbatim
    Bearer,
    /// Login and registration
    Anonymous,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Empty,
    /// Parsed, then re-sent with `Content-Type: application/json`
    Json,
    /// Forwarded byte-for-byte with the inbound content type
    Multipart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Success {
    /// Backend JSON verbatim; empty or non-JSON bodies become a generic message
    Passthrough,
    /// Body ignored, `{success: true, message}` returned
    Confirm(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reshape {
    None,
    Login,
}

#[derive(Debug, Clone, Copy)]
pub struct RouteSpec {
    /// Stable name for logs
    pub name: &'static str,
    pub verb: Verb,
    /// Local route, axum path syntax
    pub local: &'static str,
    /// Backend path template, same `{param}` names as `local`
    pub backend: &'static str,
    /// Alternate backend template used when `keyword` is present
    pub search: Option<&'static str>,
    /// Query parameters forwarded to the backend
    pub query: &'static [&'static str],
    pub access: Access,
    pub body: BodyKind,
    pub success: Success,
    pub reshape: Reshape,
    /// Human label for backend rejections
    pub label: &'static str,
}

impl RouteSpec {
    const fn new(
        name: &'static str,
        verb: Verb,
        local: &'static str,
        backend: &'static str,
        label: &'static str,
    ) -> Self {
        let body = match verb {
            Verb::Post | Verb::Put => BodyKind::Json,
            Verb::Get | Verb::Delete => BodyKind::Empty,
        };
        Self {
            name,
            verb,
            local,
            backend,
            search: None,
            query: &[],
            access: Access::Bearer,
            body,
            success: Success::Passthrough,
            reshape: Reshape::None,
            label,
        }
    }

    const fn searchable(self, search: &'static str) -> Self {
        Self {
            search: Some(search),
            query: &[SEARCH_PARAM],
            ..self
        }
    }

    const fn forwarding(self, query: &'static [&'static str]) -> Self {
        Self { query, ..self }
    }

    const fn anonymous(self) -> Self {
        Self {
            access: Access::Anonymous,
            ..self
        }
    }

    const fn multipart(self) -> Self {
        Self {
            body: BodyKind::Multipart,
            ..self
        }
    }

    const fn confirm(self, message: &'static str) -> Self {
        Self {
            success: Success::Confirm(message),
            ..self
        }
    }

    const fn login(self) -> Self {
        Self {
            reshape: Reshape::Login,
            ..self
        }
    }

    pub fn has_path_params(&self) -> bool {
        self.local.contains('{')
    }
}

use Verb::{Delete, Get, Post, Put};

pub static ROUTES: &[RouteSpec] = &[
    // Auth
    RouteSpec::new("auth.login", Post, "/api/auth/login", "/api/auth/login", "Échec de la connexion")
        .anonymous()
        .login(),
    RouteSpec::new("auth.register", Post, "/api/auth/register", "/api/auth/register", "Échec de l'inscription")
        .anonymous(),
    // Admin: users
    RouteSpec::new("admin.users.list", Get, "/api/admin/users", "/api/admin/users", "Erreur lors de la récupération des utilisateurs")
        .searchable("/api/admin/users/search"),
    RouteSpec::new("admin.users.create", Post, "/api/admin/users", "/api/admin/users", "Erreur lors de la création de l'utilisateur"),
    RouteSpec::new("admin.users.get", Get, "/api/admin/users/{id}", "/api/admin/users/{id}", "Utilisateur introuvable"),
    RouteSpec::new("admin.users.update", Put, "/api/admin/users/{id}", "/api/admin/users/{id}", "Erreur lors de la mise à jour de l'utilisateur"),
    RouteSpec::new("admin.users.delete", Delete, "/api/admin/users/{id}", "/api/admin/users/{id}", "Erreur lors de la suppression de l'utilisateur")
        .confirm("Utilisateur supprimé avec succès"),
    // Admin: departments
    RouteSpec::new("admin.departments.list", Get, "/api/admin/departments", "/api/admin/departements", "Erreur lors de la récupération des départements"),
    RouteSpec::new("admin.departments.create", Post, "/api/admin/departments", "/api/admin/departements", "Erreur lors de la création du département"),
    RouteSpec::new("admin.departments.get", Get, "/api/admin/departments/{id}", "/api/admin/departements/{id}", "Département introuvable"),
    RouteSpec::new("admin.departments.update", Put, "/api/admin/departments/{id}", "/api/admin/departements/{id}", "Erreur lors de la mise à jour du département"),
    RouteSpec::new("admin.departments.delete", Delete, "/api/admin/departments/{id}", "/api/admin/departements/{id}", "Erreur lors de la suppression du département")
        .confirm("Département supprimé avec succès"),
    // Admin: semesters
    RouteSpec::new("admin.semesters.list", Get, "/api/admin/semesters", "/api/admin/semestres", "Erreur lors de la récupération des semestres"),
    RouteSpec::new("admin.semesters.create", Post, "/api/admin/semesters", "/api/admin/semestres", "Erreur lors de la création du semestre"),
    RouteSpec::new("admin.semesters.get", Get, "/api/admin/semesters/{id}", "/api/admin/semestres/{id}", "Semestre introuvable"),
    RouteSpec::new("admin.semesters.update", Put, "/api/admin/semesters/{id}", "/api/admin/semestres/{id}", "Erreur lors de la mise à jour du semestre"),
    RouteSpec::new("admin.semesters.delete", Delete, "/api/admin/semesters/{id}", "/api/admin/semestres/{id}", "Erreur lors de la suppression du semestre")
        .confirm("Semestre supprimé avec succès"),
    // Admin: subjects
    RouteSpec::new("admin.subjects.list", Get, "/api/admin/subjects", "/api/admin/matieres", "Erreur lors de la récupération des matières"),
    RouteSpec::new("admin.subjects.create", Post, "/api/admin/subjects", "/api/admin/matieres", "Erreur lors de la création de la matière"),
    RouteSpec::new("admin.subjects.get", Get, "/api/admin/subjects/{id}", "/api/admin/matieres/{id}", "Matière introuvable"),
    RouteSpec::new("admin.subjects.update", Put, "/api/admin/subjects/{id}", "/api/admin/matieres/{id}", "Erreur lors de la mise à jour de la matière"),
    RouteSpec::new("admin.subjects.delete", Delete, "/api/admin/subjects/{id}", "/api/admin/matieres/{id}", "Erreur lors de la suppression de la matière")
        .confirm("Matière supprimée avec succès"),
    RouteSpec::new("admin.statistics", Get, "/api/admin/statistics", "/api/admin/statistiques", "Erreur lors de la récupération des statistiques"),
    // Teacher
    RouteSpec::new("teacher.courses.list", Get, "/api/teacher/courses", "/api/enseignant/cours", "Erreur lors de la récupération des cours"),
    RouteSpec::new("teacher.courses.create", Post, "/api/teacher/courses", "/api/enseignant/cours", "Erreur lors de la création du cours"),
    RouteSpec::new("teacher.courses.get", Get, "/api/teacher/courses/{id}", "/api/enseignant/cours/{id}", "Cours introuvable"),
    RouteSpec::new("teacher.courses.update", Put, "/api/teacher/courses/{id}", "/api/enseignant/cours/{id}", "Erreur lors de la mise à jour du cours"),
    RouteSpec::new("teacher.courses.delete", Delete, "/api/teacher/courses/{id}", "/api/enseignant/cours/{id}", "Erreur lors de la suppression du cours")
        .confirm("Cours supprimé avec succès"),
    RouteSpec::new("teacher.assignments.list", Get, "/api/teacher/assignments", "/api/enseignant/devoirs", "Erreur lors de la récupération des devoirs"),
    RouteSpec::new("teacher.assignments.create", Post, "/api/teacher/assignments", "/api/enseignant/devoirs", "Erreur lors de la création du devoir"),
    RouteSpec::new("teacher.assignments.update", Put, "/api/teacher/assignments/{id}", "/api/enseignant/devoirs/{id}", "Erreur lors de la mise à jour du devoir"),
    RouteSpec::new("teacher.assignments.delete", Delete, "/api/teacher/assignments/{id}", "/api/enseignant/devoirs/{id}", "Erreur lors de la suppression du devoir")
        .confirm("Devoir supprimé avec succès"),
    RouteSpec::new("teacher.submissions.list", Get, "/api/teacher/assignments/{id}/submissions", "/api/enseignant/devoirs/{id}/soumissions", "Erreur lors de la récupération des soumissions"),
    RouteSpec::new("teacher.submissions.grade", Put, "/api/teacher/submissions/{id}/grade", "/api/enseignant/soumissions/{id}/evaluer", "Erreur lors de l'évaluation de la soumission")
        .forwarding(&["note", "feedback"]),
    // Student
    RouteSpec::new("student.courses.list", Get, "/api/student/courses", "/api/etudiant/cours", "Erreur lors de la récupération des cours"),
    RouteSpec::new("student.assignments.list", Get, "/api/student/assignments", "/api/etudiant/devoirs", "Erreur lors de la récupération des devoirs"),
    RouteSpec::new("student.assignments.submit", Post, "/api/student/assignments/{id}/submit", "/api/etudiant/devoirs/{id}/submit", "Erreur lors de la soumission du devoir")
        .multipart(),
    RouteSpec::new("student.submissions.list", Get, "/api/student/submissions", "/api/etudiant/soumissions", "Erreur lors de la récupération des soumissions"),
    RouteSpec::new("student.grades", Get, "/api/student/grades", "/api/etudiant/notes", "Erreur lors de la récupération des notes"),
    // Files
    RouteSpec::new("files.upload", Post, "/api/files/upload", "/api/files/upload", "Erreur lors de l'envoi du fichier")
        .multipart(),
];

/// Look a route up by its log name
pub fn route(name: &str) -> Option<&'static RouteSpec> {
    ROUTES.iter().find(|r| r.name == name)
}
