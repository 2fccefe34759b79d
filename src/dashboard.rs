//! Ties the patient client, the in-memory store and a display surface together.
//!
//! Everything runs on one task: events (a search, a status card, a form
//! submission) are handled one after the other, so the store has a single
//! writer at any time.

use chrono::NaiveDate;
use thiserror::Error;

use crate::client::{ClientError, PatientClient};
use crate::creation::{self, FormError, NewPatient, PatientForm, StatusAssigner};
use crate::filter::PatientQuery;
use crate::render::{self, DisplaySurface};
use crate::store::PatientStore;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("failed to load patients: {0}")]
    Load(#[source] ClientError),

    #[error("invalid form: {0}")]
    Form(#[from] FormError),

    #[error("failed to create patient: {0}")]
    Submit(#[source] ClientError),
}

pub struct Dashboard<S, A> {
    client: PatientClient,
    store: PatientStore,
    surface: S,
    assigner: A,
    query: PatientQuery,
    today: Option<NaiveDate>,
}

impl<S: DisplaySurface, A: StatusAssigner> Dashboard<S, A> {
    pub fn new(client: PatientClient, surface: S, assigner: A) -> Self {
        Self {
            client,
            store: PatientStore::new(),
            surface,
            assigner,
            query: PatientQuery::all(),
            today: None,
        }
    }

    pub fn with_store(mut self, store: PatientStore) -> Self {
        self.store = store;
        self
    }

    /// Pins the date used for age calculation.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.today
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }

    pub fn store(&self) -> &PatientStore {
        &self.store
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn query(&self) -> &PatientQuery {
        &self.query
    }

    /// Re-fetches the list and renders all of it.
    ///
    /// On failure the error is logged and the store keeps its previous
    /// contents; nothing is re-rendered.
    pub async fn reload(&mut self) -> Result<usize, DashboardError> {
        match self.client.list_patients().await {
            Ok(records) => {
                let today = self.today();
                self.store.replace(records);
                self.query = PatientQuery::all();
                render::render(self.store.records(), today, &mut self.surface);
                Ok(self.store.len())
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to list patients");
                Err(DashboardError::Load(e))
            }
        }
    }

    /// Filters the store and renders the matches. Returns the match count.
    pub fn apply_filter(&mut self, text: &str, status: Option<&str>) -> usize {
        self.query = PatientQuery::new(text, status);
        let matches = self.store.filter(&self.query);
        let today = self.today();
        render::render(&matches, today, &mut self.surface);
        matches.len()
    }

    /// Sends the form to the backend.
    ///
    /// When the backend acknowledges, the form is cleared and the list is
    /// reloaded; a failed reload is only logged. Any error leaves `form`
    /// untouched so the user can retry.
    pub async fn submit(&mut self, form: &mut PatientForm) -> Result<NewPatient, DashboardError> {
        let today = self.today();
        let patient = creation::build_new_patient(form, today, &mut self.assigner)?;
        if let Err(e) = self.client.create_patient(&patient).await {
            tracing::error!(error = %e, name = %patient.name, "failed to create patient");
            return Err(DashboardError::Submit(e));
        }
        tracing::info!(name = %patient.name, status = %patient.status, "patient created");

        form.clear();
        let _ = self.reload().await;
        Ok(patient)
    }
}
