pub mod HVPEdata;

pub mod TRANSPORTdata;
