pub mod payment;
pub mod rider;
pub mod trip;
pub mod views;

pub use payment::{Payment, PaymentDraft, PaymentUpdate, Receipt};
pub use rider::{
    ContactDraft, EmergencyContact, MedicalNote, Rider, RiderDraft, RiderProfile, RiderUpdate,
};
pub use trip::{SeatRequest, Trip, TripDraft, TripRider};
pub use views::{
    AddRidersReport, DashboardView, RiderBalance, RosterEntry, RosterMember, RosterView,
    SkippedSeatRequest, TripTotals,
};
