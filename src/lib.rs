pub mod clock;
pub mod config;
pub mod domain {
    pub mod certificate;
    pub mod event;
    pub mod participant;
    pub mod payment;
}
pub mod error;
pub mod gateways;
pub mod http {
    pub mod handlers {
        pub mod attendance;
        pub mod certificates;
        pub mod events;
        pub mod payments;
        pub mod registrations;
        pub mod webhooks;
    }
}
pub mod repo {
    pub mod certificates_repo;
    pub mod events_repo;
    pub mod participants_repo;
    pub mod payments_repo;
    pub mod transactions_repo;
}
pub mod service {
    pub mod attendance_service;
    pub mod callback_service;
    pub mod certificate_service;
    pub mod events_service;
    pub mod payment_service;
    pub mod registration_service;
}
pub mod statemachine {
    pub mod transitions;
}
pub mod storage;
pub mod windows {
    pub mod evaluator;
    pub mod pricing;
}

#[derive(Clone)]
pub struct AppState {
    pub events_service: service::events_service::EventsService,
    pub registration_service: service::registration_service::RegistrationService,
    pub payment_service: service::payment_service::PaymentService,
    pub callback_service: service::callback_service::CallbackService,
    pub attendance_service: service::attendance_service::AttendanceService,
    pub certificate_service: service::certificate_service::CertificateService,
}
