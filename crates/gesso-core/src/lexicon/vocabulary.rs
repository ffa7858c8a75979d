//! Built-in Portuguese vocabulary
//!
//! Phrases are lowercase. Tag rules are `(phrase, word_boundary)` pairs:
//! boundary rules must match a whole word or phrase, the rest match by
//! substring and are reserved for multi-word phrases.

/// Phrases that mark money coming in
pub const REVENUE_PHRASES: &[&str] = &[
    "recebi", "recebemos", "recebeu",
    "me pagou", "nos pagou", "pagou",
    "transferiu", "fez transferência", "fez transferencia",
    "depositou", "fez depósito", "fez deposito",
    "pagamento recebido", "pagamento efetuado",
    "faturei", "faturamos",
    "cobrei", "cobramos",
    "caiu na conta", "caiu no pix", "caiu",
    "entrou na conta", "entrou no pix", "entrou",
    "me mandou", "me mandaram", "mandou",
    "me passou", "me passaram",
    "me enviou", "enviou",
    "pagaram", "me pagaram", "nos pagaram",
    "quitou", "quitaram",
    "acertou", "acertaram", "acertamos", "me acertou", "me acertaram",
    "liquidou", "liquidaram",
    "depositaram",
    "recebi pix", "pix caiu", "pix entrou",
    "virou", "caiu grana", "veio dinheiro",
    "recebi grana", "recebi dinheiro",
    "recebi o valor", "recebi os valores",
    "fechei serviço", "fechei trabalho",
    "ganhei", "ganhamos",
];

/// Phrases that mark money going out
pub const EXPENSE_PHRASES: &[&str] = &[
    "paguei", "pagamos", "pagou",
    "comprei", "compramos", "comprou",
    "gastei", "gastamos", "gastou", "gasto",
    "despesa", "despesas",
    "custou", "custo",
    "desembolsei", "desembolsamos",
    "adquiri", "adquirimos",
    "investi", "investimos",
    "contratei", "contratamos",
    "coloquei", "coloquei dinheiro",
    "tirei da conta", "tirei do bolso", "tirei",
    "aluguei", "alugamos",
    "transferi", "mandei dinheiro", "mandei",
    "debitou", "debitaram",
    "pedi", "pedi comida", "fiz um pedido", "pedi no",
    "fui no mercado", "fui no supermercado", "fui na farmácia",
    "fui na farmacia", "fui no restaurante", "fui na padaria",
    "fui no açougue", "fui na feira", "fui na loja",
    "passei no mercado", "passei na farmácia",
    "passei no supermercado", "passei na padaria",
    "saiu", "saiu dinheiro", "foi embora", "foi",
    "botei", "botamos",
    "abasteci", "abastecemos",
    "enchi o tanque", "enchemos o tanque",
    "repus", "reposição",
    "consertei", "consertamos",
    "arrumei",
    "tô devendo", "to devendo", "devo",
];

/// Verbs that open a new financial event; the segmenter cuts before them
pub const EVENT_VERBS: &[&str] = &[
    // eu
    "paguei", "comprei", "gastei", "recebi", "transferi",
    "depositei", "aluguei", "coloquei", "botei", "abasteci",
    "faturei", "cobrei", "desembolsei", "contratei", "pedi",
    "fui", "mandei", "enviei", "passei",
    // nós
    "pagamos", "compramos", "gastamos", "recebemos", "transferimos",
    "depositamos", "alugamos", "colocamos", "botamos", "abastecemos",
    "faturamos", "cobramos", "contratamos", "fomos",
    // ele / ela / o cliente
    "pagou", "comprou", "gastou", "recebeu", "transferiu",
    "depositou", "alugou", "colocou", "botou", "abasteceu",
    "cobrou", "contratou", "pediu", "mandou", "enviou", "passou",
    // eles / os clientes
    "pagaram", "compraram", "gastaram", "receberam", "transferiram",
    "depositaram", "alugaram", "pediram", "mandaram", "enviaram",
    "passaram", "colocaram",
    // impessoais
    "caiu", "entrou", "saiu",
];

type TagTable = &'static [(&'static str, &'static [(&'static str, bool)])];

pub const BUSINESS_TAGS: TagTable = &[
    (
        "funcionario",
        &[
            ("funcionário", false), ("funcionario", false),
            ("funcionária", false), ("funcionaria", false),
            ("colaborador", true), ("colaboradora", true),
            ("empregado", true), ("empregada", true),
            ("contratado", true), ("contratada", true),
            ("empreiteiro", true), ("empreiteira", true),
            ("subcontratado", true), ("terceirizado", true),
            ("prestador", true), ("prestadora", true),
            ("mestre de obra", false), ("mestre", true),
            ("servente", true),
            ("ajudante", true), ("ajudante de obra", false),
            ("peão", true), ("piao", true), ("peão de obra", false),
            ("diarista", true),
            ("diária", true), ("diaria", true),
            ("mão de obra", false), ("mao de obra", false),
            ("mão", true),
            ("rapaziada", true), ("rapazes", true),
            ("galera", true),
            ("pessoal da obra", false), ("pessoal do serviço", false),
            ("equipe", true),
        ],
    ),
    (
        "material",
        &[
            ("tinta", true), ("tintão", true),
            ("gesso", true), ("cimento", true),
            ("areia", true), ("brita", true),
            ("argamassa", true), ("rejunte", true),
            ("parafuso", true), ("prego", true),
            ("madeira", true), ("madeiramento", true),
            ("massa corrida", false), ("massa", true),
            ("fio", true), ("cabo", true),
            ("tubo", true), ("cano", true),
            ("lixa", true), ("rolo", true), ("rolo de pintura", false),
            ("pincel", true), ("brocha", true),
            ("primer", true), ("selador", true),
            ("impermeabilizante", true), ("impermeabilização", true),
            ("cola", true), ("vedante", true),
            ("placa", true), ("placa de drywall", false), ("drywall", true),
            ("tijolo", true), ("bloco", true),
            ("cal", true),
            ("piso", true), ("porcelanato", true), ("cerâmica", true), ("ceramica", true),
            ("telha", true), ("cumeeira", true),
            ("insumo", true),
            ("materiais", true),
            ("comprei material", false), ("gastei com material", false),
            ("compra de material", false), ("material de obra", false),
            ("material para obra", false), ("material para o serviço", false),
        ],
    ),
    (
        "ferramenta",
        &[
            ("ferramenta", true), ("ferramentas", true),
            ("equipamento", true), ("equipamentos", true),
            ("furadeira", true), ("martelete", true),
            ("esmerilhadeira", true), ("esmeril", true),
            ("betoneira", true), ("misturador", true),
            ("andaime", true), ("andaimes", true),
            ("escada", true),
            ("mangueira", true), ("compressor", true),
            ("gerador", true), ("motosserra", true),
            ("aluguel de equipamento", false), ("locação de equipamento", false),
            ("aluguel de ferramenta", false), ("locação de ferramenta", false),
        ],
    ),
    (
        "transporte",
        &[
            ("gasolina", true), ("combustível", true), ("combustivel", true),
            ("diesel", true), ("etanol", true), ("álcool", true), ("alcool", true),
            ("abasteci", true), ("abastecemos", true), ("enchi o tanque", false),
            ("frete", true), ("fretes", true),
            ("pedágio", true), ("pedagio", true),
            ("estacionamento", true),
            ("uber", true), ("99", true), ("táxi", true), ("taxi", true),
            ("passagem", true),
            ("aluguel da van", false), ("aluguel do carro", false),
            ("aluguel da caminhonete", false),
            ("manutenção do carro", false), ("manutenção da van", false),
            ("conserto do carro", false), ("revisão do carro", false),
            ("troca de óleo", false), ("troca de pneu", false),
            ("deslocamento", true), ("translado", true),
        ],
    ),
    (
        "imposto",
        &[
            ("imposto", true), ("impostos", true),
            ("nota fiscal", false), ("nf", true),
            ("simples nacional", false), ("simples", true),
            ("das", true), ("iss", true),
            ("inss", true), ("fgts", true),
            ("contador", true), ("contadora", true), ("contabilidade", true),
            ("taxa", true), ("taxas", true),
            ("alvará", true), ("alvara", true),
            ("licença", true), ("licenca", true),
        ],
    ),
];

pub const PERSONAL_TAGS: TagTable = &[
    (
        "alimentacao",
        &[
            ("mercado", true), ("supermercado", true), ("hipermercado", true),
            ("feira", true), ("quitanda", true),
            ("açougue", true), ("acougue", true), ("peixaria", true),
            ("padaria", true), ("confeitaria", true),
            ("restaurante", true), ("lanchonete", true),
            ("pizzaria", true), ("hamburgueria", true),
            ("lanche", true), ("refeição", true), ("refeicao", true),
            ("almoço", true), ("almoco", true),
            ("janta", true), ("jantar", true), ("ceia", true),
            ("café", true), ("cafezinho", true),
            ("café da manhã", false), ("cafe da manha", false),
            ("marmita", true),
            ("ifood", true), ("delivery", true), ("rappi", true),
            ("uber eats", false),
            ("pizza", true), ("hamburguer", true), ("hamburger", true),
            ("comida", true), ("alimento", true), ("alimentação", true), ("alimentacao", true),
            ("rancho", true),
            ("feira do mês", false), ("compras do mês", false),
        ],
    ),
    (
        "moradia",
        &[
            ("aluguel da casa", false), ("aluguel do apartamento", false),
            ("aluguel do apto", false), ("aluguel", true),
            ("condomínio", true), ("condominio", true),
            ("conta de luz", false), ("conta de água", false), ("conta de agua", false),
            ("conta de gás", false), ("conta de gas", false),
            ("energia elétrica", false), ("energia eletrica", false),
            ("água da casa", false), ("água encanada", false),
            ("internet da casa", false), ("wi-fi", true), ("wifi", true),
            ("iptu", true),
            ("financiamento da casa", false), ("prestação da casa", false),
            ("prestação do apê", false), ("prestação do apto", false),
            ("reforma da casa", false),
        ],
    ),
    (
        "transporte_pessoal",
        &[
            ("financiamento do carro", false), ("prestação do carro", false),
            ("seguro do carro", false), ("seguro do veículo", false),
            ("ipva", true), ("licenciamento", true),
            ("ônibus", true), ("onibus", true),
            ("metrô", true), ("metro", true), ("trem", true),
            ("passagem de ônibus", false), ("cartão de transporte", false),
            ("bilhete único", false),
            ("manutenção do carro pessoal", false), ("conserto do carro pessoal", false),
        ],
    ),
    (
        "saude",
        &[
            ("médico", true), ("medico", true),
            ("hospital", true), ("pronto-socorro", true), ("pronto socorro", false),
            ("clínica", true), ("clinica", true), ("upa", true),
            ("farmácia", true), ("farmacia", true), ("drogaria", true),
            ("remédio", true), ("remedio", true), ("medicamento", true),
            ("plano de saúde", false), ("plano de saude", false),
            ("plano", true),
            ("exame", true), ("exames", true),
            ("consulta", true), ("consultas", true),
            ("dentista", true), ("ortodontista", true),
            ("fisioterapeuta", true), ("fisioterapia", true),
            ("psicólogo", true), ("psicologo", true), ("psiquiatra", true),
            ("academia de saúde", false), ("nutricionista", true),
            ("vacina", true), ("vacinação", true),
            ("cirurgia", true), ("internação", true),
        ],
    ),
    (
        "educacao",
        &[
            ("escola", true), ("colégio", true), ("colegio", true),
            ("faculdade", true), ("universidade", true), ("facul", true),
            ("curso", true), ("cursos", true),
            ("mensalidade", true), ("anuidade", true),
            ("material escolar", false), ("material do curso", false),
            ("livro", true), ("apostila", true),
            ("aula", true), ("aulas", true),
            ("treinamento", true),
        ],
    ),
    (
        "lazer",
        &[
            ("lazer", true), ("diversão", true), ("diversao", true),
            ("cinema", true), ("teatro", true), ("show", true),
            ("viagem", true), ("passeio", true), ("excursão", true),
            ("hotel", true), ("pousada", true), ("hospedagem", true),
            ("parque", true), ("clube", true),
            ("academia", true), ("personal", true),
            ("streaming", true), ("netflix", true), ("spotify", true),
            ("amazon prime", false), ("disney", true),
            ("assinatura", true), ("jogo", true), ("games", true),
            ("bar", true), ("balada", true), ("festa", true),
            ("churrasco", true),
        ],
    ),
    (
        "vestuario",
        &[
            ("roupa", true), ("roupas", true),
            ("calçado", true), ("calçados", true),
            ("sapato", true), ("tênis", true), ("tenis", true),
            ("sandália", true), ("sandalia", true),
            ("vestuário", true), ("vestuario", true),
            ("camisa", true), ("camiseta", true), ("blusa", true),
            ("calça", true), ("calca", true), ("bermuda", true),
            ("vestido", true), ("saia", true),
            ("cueca", true), ("meia", true), ("meias", true),
            ("roupa íntima", false),
            ("loja de roupa", false), ("shopping", true),
        ],
    ),
    (
        "internet_telefone",
        &[
            ("internet", true), ("plano de internet", false),
            ("telefone", true), ("celular", true),
            ("plano do celular", false), ("plano celular", false),
            ("recarga", true), ("recarga de celular", false),
            ("tim", true), ("vivo", true), ("claro", true), ("oi", true),
            ("net", true), ("claro net", false),
        ],
    ),
];

/// Short phrases that frame an untagged expense as business
pub const BUSINESS_CONTEXT: &[&str] = &[
    "obra", "do serviço", "para o serviço", "para a obra",
    "do trabalho", "para o trabalho", "da obra", "do cliente",
    "para o cliente", "no serviço", "no trabalho",
];

/// Short phrases that frame an untagged expense as personal
pub const PERSONAL_CONTEXT: &[&str] = &[
    "minha casa", "meu carro", "para mim", "pessoal",
    "vida pessoal", "pra mim", "pra minha família", "minha família",
];
