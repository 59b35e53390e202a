mod tests_characterization;
mod tests_properties;
mod tests_recharacterize;
