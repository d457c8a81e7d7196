mod assess;
mod properties;
mod scenarios;
