// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::model::{DomainKind, Environment, Role};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Nav,
    Search,
    ConfirmEnvironment,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub mode: AppMode,
    pub active_domain: DomainKind,
    pub environment: Environment,
    pub pending_environment: Option<Environment>,
    pub role: Role,
    pub status_line: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            mode: AppMode::Nav,
            active_domain: DomainKind::Partnerships,
            environment: Environment::Staging,
            pending_environment: None,
            role: Role::User,
            status_line: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    NextDomain,
    PrevDomain,
    EnterSearch,
    ExitToNav,
    RequestEnvironment(Environment),
    ConfirmEnvironment,
    CancelEnvironment,
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    ModeChanged(AppMode),
    DomainChanged(DomainKind),
    EnvironmentChanged(Environment),
    EnvironmentDenied(Environment),
    StatusUpdated(String),
    StatusCleared,
}

impl AppState {
    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::NextDomain => self.rotate_domain(1),
            AppCommand::PrevDomain => self.rotate_domain(-1),
            AppCommand::EnterSearch => {
                self.mode = AppMode::Search;
                vec![AppEvent::ModeChanged(self.mode)]
            }
            AppCommand::ExitToNav => {
                self.mode = AppMode::Nav;
                self.pending_environment = None;
                vec![AppEvent::ModeChanged(self.mode), self.set_status("nav")]
            }
            AppCommand::RequestEnvironment(environment) => self.request_environment(environment),
            AppCommand::ConfirmEnvironment => self.confirm_environment(),
            AppCommand::CancelEnvironment => {
                if self.pending_environment.take().is_none() {
                    return Vec::new();
                }
                self.mode = AppMode::Nav;
                vec![
                    AppEvent::ModeChanged(self.mode),
                    self.set_status("switch cancelled"),
                ]
            }
            AppCommand::SetStatus(message) => vec![self.set_status(&message)],
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
        }
    }

    fn rotate_domain(&mut self, delta: isize) -> Vec<AppEvent> {
        let domains = DomainKind::ALL;
        let current = domains
            .iter()
            .position(|domain| *domain == self.active_domain)
            .unwrap_or(0) as isize;
        let len = domains.len() as isize;
        let next = (current + delta).rem_euclid(len) as usize;
        self.active_domain = domains[next];
        vec![AppEvent::DomainChanged(self.active_domain)]
    }

    fn request_environment(&mut self, environment: Environment) -> Vec<AppEvent> {
        if environment == self.environment {
            return vec![self.set_status(&format!("already on {}", environment.as_str()))];
        }

        if environment == Environment::Production && !self.role.can_access_production() {
            return vec![
                AppEvent::EnvironmentDenied(environment),
                self.set_status("production requires admin access"),
            ];
        }

        self.pending_environment = Some(environment);
        self.mode = AppMode::ConfirmEnvironment;
        vec![
            AppEvent::ModeChanged(self.mode),
            self.set_status(&format!("confirm switch to {}", environment.as_str())),
        ]
    }

    fn confirm_environment(&mut self) -> Vec<AppEvent> {
        let Some(environment) = self.pending_environment.take() else {
            return Vec::new();
        };
        self.environment = environment;
        self.mode = AppMode::Nav;
        vec![
            AppEvent::EnvironmentChanged(environment),
            AppEvent::ModeChanged(self.mode),
            self.set_status(&format!("switched to {}", environment.as_str())),
        ]
    }

    fn set_status(&mut self, message: &str) -> AppEvent {
        self.status_line = Some(message.to_owned());
        AppEvent::StatusUpdated(message.to_owned())
    }
}
