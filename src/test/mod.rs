mod dynamics;
mod locus;
mod topologies;
mod trace;
