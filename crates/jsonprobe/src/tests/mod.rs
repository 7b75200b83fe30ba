mod arbitrary;
mod properties;
