pub mod checkout;
pub mod otp;
pub mod presence;
