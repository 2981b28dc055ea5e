//! Application state holder.
//!
//! Owns the loaded records and the current selection. Every mutation
//! recomputes the [`Dashboard`] and publishes it to subscribers through a
//! `watch` channel; derived values are never patched in place.

use crate::analysis::{
    build_crosstab, company_buckets, compute_kpis, department_buckets, industry_buckets,
    role_buckets,
};
use crate::config::{ChartsConfig, MatrixConfig};
use crate::filter::{filter_records, EmptySelection};
use crate::models::{Dashboard, GraduateRecord, Selection};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

/// Settings that shape the derivation but never change at runtime.
#[derive(Debug, Clone, Default)]
pub struct DeriveOptions {
    pub empty: EmptySelection,
    pub charts: ChartsConfig,
    pub matrix: MatrixConfig,
}

/// Compute every aggregate for `selection` over `records`.
pub fn derive(
    records: &[GraduateRecord],
    selection: &Selection,
    options: &DeriveOptions,
) -> Dashboard {
    let filtered = filter_records(records, selection, options.empty);
    debug!(
        "Recomputing dashboard: {} of {} records selected",
        filtered.len(),
        records.len()
    );

    Dashboard {
        selection: selection.clone(),
        kpis: compute_kpis(&filtered),
        industries: industry_buckets(&filtered, options.charts.industry),
        companies: company_buckets(&filtered, options.charts.employer),
        roles: role_buckets(&filtered, options.charts.role),
        departments: department_buckets(&filtered, options.charts.department),
        matrix: build_crosstab(&filtered, options.matrix),
    }
}

/// Records, selection and the latest derived dashboard.
pub struct DashboardStore {
    records: Arc<[GraduateRecord]>,
    selection: Selection,
    options: DeriveOptions,
    sender: watch::Sender<Arc<Dashboard>>,
}

impl DashboardStore {
    pub fn new(
        records: Vec<GraduateRecord>,
        selection: Selection,
        options: DeriveOptions,
    ) -> Self {
        let records: Arc<[GraduateRecord]> = records.into();
        let dashboard = derive(&records, &selection, &options);
        let (sender, _) = watch::channel(Arc::new(dashboard));

        Self {
            records,
            selection,
            options,
            sender,
        }
    }

    pub fn records(&self) -> &[GraduateRecord] {
        &self.records
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// The current dashboard.
    #[cfg(test)]
    pub fn snapshot(&self) -> Arc<Dashboard> {
        self.sender.borrow().clone()
    }

    /// Receive a notification after every recompute.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Dashboard>> {
        self.sender.subscribe()
    }

    /// Show a single program, or every program when `career` is `None`.
    pub fn select_only_career(&mut self, career: Option<&str>) {
        self.selection.careers.clear();
        if let Some(career) = career {
            self.selection.careers.insert(career.to_string());
        }
        self.recompute();
    }

    /// Add or remove one program from the selection.
    pub fn toggle_career(&mut self, career: &str) {
        if !self.selection.careers.remove(career) {
            self.selection.careers.insert(career.to_string());
        }
        self.recompute();
    }

    /// Select every program present in the data.
    pub fn select_all_careers(&mut self) {
        self.selection.careers = self.records.iter().map(|r| r.career.clone()).collect();
        self.recompute();
    }

    pub fn set_company(&mut self, company: Option<String>) {
        self.selection.company = company;
        self.recompute();
    }

    pub fn clear_company(&mut self) {
        self.set_company(None);
    }

    fn recompute(&self) {
        let dashboard = derive(&self.records, &self.selection, &self.options);
        self.sender.send_replace(Arc::new(dashboard));
    }
}
