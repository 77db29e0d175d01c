// Built-in lookup data.
//
// Every table is scanned first-match-wins in declaration order, so more
// specific patterns come before the shorter ones they contain.

/// Two-letter markers as written in "Institute (XX)" affiliations.
pub(crate) const COUNTRY_CODES: &[(&str, &str)] = &[
    ("US", "USA"),
    ("UK", "UK"),
    ("GB", "UK"),
    ("DE", "Germany"),
    ("FR", "France"),
    ("IT", "Italy"),
    ("JP", "Japan"),
    ("CN", "China"),
    ("KR", "Korea"),
    ("CH", "Switzerland"),
    ("IN", "India"),
    ("AT", "Austria"),
    ("PL", "Poland"),
    ("NL", "Netherlands"),
    ("RU", "Russia"),
    ("BR", "Brazil"),
    ("ES", "Spain"),
    ("CA", "Canada"),
    ("MX", "Mexico"),
    ("AU", "Australia"),
    ("FI", "Finland"),
    ("PT", "Portugal"),
    ("BE", "Belgium"),
    ("CZ", "Czech Republic"),
    ("HU", "Hungary"),
    ("NO", "Norway"),
    ("SE", "Sweden"),
    ("DK", "Denmark"),
    ("IL", "Israel"),
    ("TW", "Taiwan"),
    ("ZA", "South Africa"),
    ("CL", "Chile"),
    ("AR", "Argentina"),
    ("TR", "Turkey"),
    ("GR", "Greece"),
    ("RO", "Romania"),
    ("UA", "Ukraine"),
    ("SK", "Slovakia"),
    ("EG", "Egypt"),
];

/// (canonical name, aliases, keywords). Aliases are alternate spellings of
/// the country itself; keywords are places and institutions that imply it.
pub(crate) const COUNTRIES: &[(&str, &[&str], &[&str])] = &[
    (
        "USA",
        &["United States", "United States of America", "America", "U.S.A.", "U.S."],
        &[
            "Berkeley", "MIT", "Brookhaven", "BNL", "FNAL", "Fermilab", "Los Alamos", "LANL",
            "Argonne", "ANL", "LBNL", "ORNL", "SLAC", "Chicago", "Yale", "Harvard", "Princeton",
            "NYU", "Stony Brook", "Vanderbilt", "Ohio", "Michigan", "UCLA",
            "Caltech", "Texas", "Illinois", "Indiana", "Purdue", "Iowa", "Maryland",
            "Washington", "Oregon", "California", "Florida", "Tennessee",
            "Pennsylvania", "New York", "New Mexico", "Massachusetts", "New Jersey",
            "Connecticut", "Stanford", "Duke", "Rutgers", "Minnesota", "Colorado", "Arizona",
            "Kansas", "Kentucky", "Alabama", "Virginia", "Notre Dame", "Northwestern",
        ],
    ),
    (
        "UK",
        &["United Kingdom", "Great Britain", "Britain", "England", "Scotland", "Wales"],
        &[
            "Oxford", "Cambridge", "Imperial", "Edinburgh", "Manchester", "Birmingham",
            "Liverpool", "Glasgow", "Bristol", "Durham", "Warwick", "King's College",
            "Queen Mary", "Nottingham", "Sheffield", "Southampton",
        ],
    ),
    ("Germany", &["Deutschland"], &[]),
    ("France", &[], &[]),
    ("Italy", &["Italia"], &[]),
    ("Japan", &["Nippon"], &[]),
    ("China", &["P.R. China", "PR China", "People's Republic of China"], &[]),
    ("Korea", &["South Korea", "Republic of Korea"], &[]),
    ("Switzerland", &["Schweiz", "Suisse", "Svizzera"], &[]),
    ("India", &[], &[]),
    ("Brazil", &["Brasil"], &[]),
    ("Russia", &["Russian Federation"], &[]),
    ("Poland", &["Polska"], &[]),
    ("Netherlands", &["The Netherlands", "Nederland", "Holland"], &[]),
    ("Spain", &["España", "Espana"], &[]),
    ("Canada", &[], &[]),
    ("Mexico", &["México"], &[]),
    ("Australia", &[], &[]),
    ("Finland", &["Suomi"], &[]),
    ("Austria", &["Österreich", "Osterreich"], &[]),
    ("Portugal", &[], &[]),
    ("Belgium", &["Belgique", "België"], &[]),
    ("Czech Republic", &["Czechia"], &[]),
    ("Hungary", &["Magyarország"], &[]),
    ("Norway", &["Norge"], &[]),
    ("Sweden", &["Sverige"], &[]),
    ("Denmark", &["Danmark"], &[]),
    ("Israel", &[], &[]),
    ("Taiwan", &[], &[]),
    ("South Africa", &[], &[]),
    ("Chile", &[], &[]),
    ("Argentina", &[], &[]),
    ("Turkey", &["Türkiye", "Turkiye"], &[]),
    ("Greece", &[], &[]),
    ("Romania", &["România"], &[]),
    ("Ukraine", &[], &[]),
    ("Slovakia", &[], &[]),
    ("Egypt", &[], &[]),
];

/// Institute substrings. Names claimed by more than one country
/// ("Institute of Physics", "Northeastern University") and acronyms that
/// occur inside ordinary words ("MIT", "RAL", "CEA", "PSI") are not listed.
///
/// The institute pass runs before the keyword pass, so places whose names
/// contain a keyword of another country ("Lausanne" holds "usa",
/// "New South Wales" holds "Wales") are listed here to claim them first.
pub(crate) const INSTITUTES: &[(&str, &str)] = &[
    // Multi-word names first.
    ("Central China Normal University", "China"),
    ("University of Science and Technology of China", "China"),
    ("Variable Energy Cyclotron Centre", "India"),
    ("Tata Institute of Fundamental Research", "India"),
    ("Bhabha Atomic", "India"),
    ("Helsinki Institute of Physics", "Finland"),
    ("University of Helsinki", "Finland"),
    ("University of Jyvaskyla", "Finland"),
    ("Lawrence Berkeley", "USA"),
    ("Lawrence Livermore", "USA"),
    ("Thomas Jefferson", "USA"),
    ("STAR Collaboration", "USA"),
    ("Oak Ridge", "USA"),
    ("Los Alamos", "USA"),
    ("Rutherford Appleton", "UK"),
    ("Paul Scherrer", "Switzerland"),
    ("Polish Academy", "Poland"),
    ("AGH University", "Poland"),
    ("Austrian Academy", "Austria"),
    ("Theoretische Physik", "Germany"),
    ("Institut für", "Germany"),
    ("Niels Bohr", "Denmark"),
    ("Academia Sinica", "Taiwan"),
    ("Paris Sud", "France"),
    ("Paris-Saclay", "France"),
    ("Sao Paulo", "Brazil"),
    ("São Paulo", "Brazil"),
    ("Tel Aviv", "Israel"),
    ("Czech Technical", "Czech Republic"),
    ("Rice University", "USA"),
    ("Columbia University", "USA"),
    ("Georgia Institute of Technology", "USA"),
    ("Georgia Tech", "USA"),
    ("University of Georgia", "USA"),
    ("University College London", "UK"),
    ("British Columbia", "Canada"),
    ("New South Wales", "Australia"),
    ("Hebrew University", "Israel"),
    // Laboratories and acronyms.
    ("Brookhaven", "USA"),
    ("Fermilab", "USA"),
    ("Argonne", "USA"),
    ("BNL", "USA"),
    ("FNAL", "USA"),
    ("LBNL", "USA"),
    ("LLNL", "USA"),
    ("LANL", "USA"),
    ("ORNL", "USA"),
    ("SLAC", "USA"),
    ("JLab", "USA"),
    ("Berkeley", "USA"),
    ("CERN", "Switzerland"),
    ("DESY", "Germany"),
    ("GSI", "Germany"),
    ("KEK", "Japan"),
    ("RIKEN", "Japan"),
    ("IHEP", "China"),
    ("SINAP", "China"),
    ("JINR", "Russia"),
    ("Dubna", "Russia"),
    ("INFN", "Italy"),
    ("SUBATECH", "France"),
    ("GANIL", "France"),
    ("Saclay", "France"),
    ("TRIUMF", "Canada"),
    ("McGill", "Canada"),
    ("Nikhef", "Netherlands"),
    ("Wigner", "Hungary"),
    ("Weizmann", "Israel"),
    ("iThemba", "South Africa"),
    ("VECC", "India"),
    ("TIFR", "India"),
    ("JYFL", "Finland"),
    ("Jyvaskyla", "Finland"),
    ("Jyväskylä", "Finland"),
    ("Aalto", "Finland"),
    // Universities and cities.
    ("Purdue", "USA"),
    ("Rutgers", "USA"),
    ("Bielefeld", "Germany"),
    ("Bonn", "Germany"),
    ("Darmstadt", "Germany"),
    ("Frankfurt", "Germany"),
    ("Freiburg", "Germany"),
    ("Heidelberg", "Germany"),
    ("Münster", "Germany"),
    ("Tübingen", "Germany"),
    ("Wuppertal", "Germany"),
    ("Hiroshima", "Japan"),
    ("Nagoya", "Japan"),
    ("Tohoku", "Japan"),
    ("Tsukuba", "Japan"),
    ("Waseda", "Japan"),
    ("Fudan", "China"),
    ("Huzhou", "China"),
    ("Lanzhou", "China"),
    ("Peking", "China"),
    ("Tsinghua", "China"),
    ("Wuhan", "China"),
    ("Aligarh", "India"),
    ("Banaras", "India"),
    ("Bhubaneswar", "India"),
    ("Calcutta", "India"),
    ("Jammu", "India"),
    ("Panjab", "India"),
    ("Coimbra", "Portugal"),
    ("Jagiellonian", "Poland"),
    ("Krakow", "Poland"),
    ("Warsaw", "Poland"),
    ("Leuven", "Belgium"),
    ("Utrecht", "Netherlands"),
    ("Padova", "Italy"),
    ("Torino", "Italy"),
    ("Trento", "Italy"),
    ("Sapienza", "Italy"),
    ("Zurich", "Switzerland"),
    ("Lausanne", "Switzerland"),
    ("EPFL", "Switzerland"),
    ("Jerusalem", "Israel"),
    ("Busan", "Korea"),
    ("Pusan", "Korea"),
    ("Kurukshetra", "India"),
    ("Fukuoka", "Japan"),
    ("Ukraine", "Ukraine"),
    ("Zürich", "Switzerland"),
    ("Massachusetts Institute of Technology", "USA"),
];

/// Applied during reconciliation to records whose country is still unknown.
pub(crate) const FIXUPS: &[(&str, &str)] = &[
    ("University of Jyvaskyla", "Finland"),
    ("Jyvaskyla University", "Finland"),
    ("University of Helsinki", "Finland"),
    ("Helsinki Institute of Physics", "Finland"),
    ("JYFL", "Finland"),
    (", Finland", "Finland"),
    ("BNL", "USA"),
    ("LBNL", "USA"),
    ("ORNL", "USA"),
    ("LANL", "USA"),
    ("FNAL", "USA"),
    ("JLab", "USA"),
    ("CERN", "Switzerland"),
    ("GSI", "Germany"),
    ("DESY", "Germany"),
    ("JINR", "Russia"),
    ("RIKEN", "Japan"),
    ("KEK", "Japan"),
    ("TIFR", "India"),
    ("VECC", "India"),
];
