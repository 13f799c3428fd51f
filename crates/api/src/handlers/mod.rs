pub mod checkout;
pub mod enrolment;
