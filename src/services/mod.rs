pub mod moms_week;
